use chrono::{NaiveTime, Timelike};
use iced::{
    Color, Point, Rectangle, Renderer, Theme, Vector, mouse,
    widget::canvas::{self, Path, Stroke, Text},
};

use crate::{
    model::{Prayer, PrayerSchedule},
    schedule::PrayerStatus,
    style,
};

/// 24-hour dial: one tick per prayer, a hand for the current time and the
/// countdown to the next prayer in the middle.
pub struct DayDial<'a> {
    pub schedule: &'a PrayerSchedule,
    pub status: PrayerStatus,
    pub now: NaiveTime,
    pub countdown: String,
    pub cache: &'a canvas::Cache,
}

/// Angle in radians for a time of day, midnight at the top, clockwise.
pub fn dial_angle(time: NaiveTime) -> f32 {
    let minutes = (time.hour() * 60 + time.minute()) as f32;
    minutes / (24.0 * 60.0) * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2
}

/// Tick color for a prayer given the current classification.
pub fn prayer_color(prayer: Prayer, status: PrayerStatus) -> Color {
    if status.current == Some(prayer) {
        style::ACCENT_GREEN
    } else if status.next == prayer {
        style::ACCENT_ORANGE
    } else {
        style::TEXT_MUTED
    }
}

fn on_circle(center: Point, radius: f32, angle: f32) -> Point {
    center + Vector::new(radius * angle.cos(), radius * angle.sin())
}

impl<'a, Message> canvas::Program<Message> for DayDial<'a> {
    type State = ();

    fn draw(
        &self,
        _: &Self::State,
        renderer: &Renderer,
        _: &Theme,
        bounds: Rectangle,
        _: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let geo = self.cache.draw(renderer, bounds.size(), |frame| {
            let center = frame.center();
            let radius = bounds.width.min(bounds.height) / 2.0 - 12.0;

            let ring = Path::circle(center, radius);
            frame.stroke(
                &ring,
                Stroke::default().with_color(style::STROKE_DIM).with_width(6.0),
            );

            for (prayer, time) in self.schedule.iter() {
                let angle = dial_angle(time);
                let tick = Path::line(
                    on_circle(center, radius - 10.0, angle),
                    on_circle(center, radius + 6.0, angle),
                );
                frame.stroke(
                    &tick,
                    Stroke::default()
                        .with_color(prayer_color(prayer, self.status))
                        .with_width(4.0)
                        .with_line_cap(canvas::LineCap::Round),
                );
            }

            let hand = Path::line(center, on_circle(center, radius - 18.0, dial_angle(self.now)));
            frame.stroke(
                &hand,
                Stroke::default()
                    .with_color(style::ACCENT_BLUE)
                    .with_width(2.0)
                    .with_line_cap(canvas::LineCap::Round),
            );

            frame.fill_text(Text {
                content: self.countdown.clone(),
                position: center + Vector::new(0.0, -8.0),
                color: style::TEXT_BRIGHT,
                size: 26.0.into(),
                align_x: iced::alignment::Horizontal::Center.into(),
                align_y: iced::alignment::Vertical::Center,
                ..Default::default()
            });

            frame.fill_text(Text {
                content: format!("until {}", self.status.next),
                position: center + Vector::new(0.0, 18.0),
                color: prayer_color(self.status.next, self.status),
                size: 13.0.into(),
                align_x: iced::alignment::Horizontal::Center.into(),
                align_y: iced::alignment::Vertical::Center,
                ..Default::default()
            });
        });
        vec![geo]
    }
}
