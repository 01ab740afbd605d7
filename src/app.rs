use std::{sync::Arc, time::Duration};

use iced::{
    Alignment, Border, Color, Element, Length, Shadow, Subscription, Task, Theme, Vector,
    keyboard,
    widget::{
        Column, Space, button,
        canvas::{Cache, Canvas},
        center, column, container, mouse_area, row, scrollable, stack, text, text_input,
    },
};
use prayer_times::{
    config::AppConfig,
    error::{AppError, LocationError},
    model::{Location, Prayer, PrayerSchedule, SearchResult},
    schedule::{format_countdown, format_twelve_hour},
    services::Services,
    state::{AppState, ErrorId, ModalTab, RefreshAction, Status},
    style,
    widgets::day_dial::DayDial,
};

/// Keys the suggestion list reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Escape,
}

pub struct PrayerTimesApp {
    config: Arc<AppConfig>,
    services: Services,
    state: AppState,
    dial_cache: Cache,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    Refresh,
    Retry,

    // Location & schedule results
    Located(u64, Result<Location, LocationError>),
    ScheduleLoaded(u64, Result<PrayerSchedule, AppError>),

    // Modal
    OpenModal,
    CloseModal,
    SwitchTab(ModalTab),
    DismissModalError(ErrorId),

    // City tab
    CityInputChanged(String),
    CitySubmitted,
    SuggestionsLoaded(u64, Result<Vec<SearchResult>, AppError>),
    SuggestionPicked(usize),
    KeyPressed(NavKey),
    PointerPressed,
    BlurGraceElapsed(u64),
    SearchCity,
    SearchCompleted(u64, Result<Vec<SearchResult>, AppError>),
    ResultSelected(usize),

    // Coordinates tab
    LatitudeChanged(String),
    LongitudeChanged(String),
    UseCoordinates,
    CoordinatesValidated(u64, Result<Location, AppError>),

    // Quote
    NewQuote,
    ToggleReflection,
}

impl PrayerTimesApp {
    pub fn new(config: Arc<AppConfig>, services: Services) -> (Self, Task<Message>) {
        let state = AppState::new(services.now_local(), &config.autocomplete);
        let mut app = Self {
            config,
            services,
            state,
            dial_cache: Cache::new(),
        };
        app.state.new_quote(&mut rand::rng());
        let task = app.locate();
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                let action = self.state.tick(self.services.now_local());
                self.dial_cache.clear();
                match action {
                    Some(RefreshAction::Fetch(location)) => self.fetch_schedule(location),
                    Some(RefreshAction::Locate) => self.locate(),
                    None => Task::none(),
                }
            }
            Message::Refresh => match self.state.refresh() {
                RefreshAction::Fetch(location) => self.fetch_schedule(location),
                RefreshAction::Locate => self.locate(),
            },
            Message::Retry => self.locate(),
            Message::Located(id, result) => match self.state.locate_finished(id, result) {
                Some(location) => self.fetch_schedule(location),
                None => Task::none(),
            },
            Message::ScheduleLoaded(id, result) => {
                if self
                    .state
                    .schedule_finished(id, result, self.services.now_local())
                {
                    self.dial_cache.clear();
                }
                Task::none()
            }

            Message::OpenModal => {
                self.state.open_modal();
                Task::none()
            }
            Message::CloseModal => {
                self.state.close_modal();
                Task::none()
            }
            Message::SwitchTab(tab) => {
                self.state.switch_tab(tab);
                Task::none()
            }
            Message::DismissModalError(id) => {
                self.state.dismiss_modal_error(id);
                Task::none()
            }

            Message::CityInputChanged(value) => match self.state.city_input_changed(value) {
                Some(query) => {
                    let services = self.services.clone();
                    let generation = query.generation;
                    Task::perform(
                        async move { services.search(&query.text).await },
                        move |r| Message::SuggestionsLoaded(generation, r),
                    )
                }
                None => Task::none(),
            },
            Message::CitySubmitted => match self.state.confirm_suggestion() {
                Some(location) => self.fetch_schedule(location),
                None => self.search_city(),
            },
            Message::SuggestionsLoaded(generation, result) => {
                self.state.suggestions_arrived(generation, result);
                Task::none()
            }
            Message::SuggestionPicked(index) => match self.state.pick_suggestion(index) {
                Some(location) => self.fetch_schedule(location),
                None => Task::none(),
            },
            Message::KeyPressed(key) => {
                let modal = self.state.modal();
                if modal.open && modal.tab == ModalTab::City {
                    match key {
                        NavKey::Down => self.state.highlight_next_suggestion(),
                        NavKey::Up => self.state.highlight_previous_suggestion(),
                        NavKey::Escape => self.state.dismiss_suggestions(),
                    }
                }
                Task::none()
            }
            Message::PointerPressed => {
                if !self.state.autocomplete().is_visible() {
                    return Task::none();
                }
                let token = self.state.city_field_blurred();
                let grace = self.state.autocomplete().blur_grace();
                Task::perform(
                    async move { tokio::time::sleep(grace).await },
                    move |_| Message::BlurGraceElapsed(token),
                )
            }
            Message::BlurGraceElapsed(token) => {
                self.state.blur_grace_elapsed(token);
                Task::none()
            }
            Message::SearchCity => self.search_city(),
            Message::SearchCompleted(id, result) => {
                match self.state.city_search_finished(id, result) {
                    Some(error) => self.expire_modal_error(error),
                    None => Task::none(),
                }
            }
            Message::ResultSelected(index) => {
                let Some(result) = self.state.modal().results.get(index).cloned() else {
                    return Task::none();
                };
                let location = self.state.select_result(&result);
                self.fetch_schedule(location)
            }

            Message::LatitudeChanged(value) => {
                self.state.set_latitude_input(value);
                Task::none()
            }
            Message::LongitudeChanged(value) => {
                self.state.set_longitude_input(value);
                Task::none()
            }
            Message::UseCoordinates => {
                if self.state.modal().validating {
                    return Task::none();
                }
                match self.state.parse_coordinates() {
                    Ok((id, coordinates)) => {
                        let services = self.services.clone();
                        Task::perform(
                            async move { services.location_from_coordinates(coordinates).await },
                            move |r| Message::CoordinatesValidated(id, r),
                        )
                    }
                    Err(error) => self.expire_modal_error(error),
                }
            }
            Message::CoordinatesValidated(id, result) => {
                match self.state.coordinates_finished(id, result) {
                    Some(Ok(location)) => self.fetch_schedule(location),
                    Some(Err(error)) => self.expire_modal_error(error),
                    None => Task::none(),
                }
            }

            Message::NewQuote => {
                self.state.new_quote(&mut rand::rng());
                Task::none()
            }
            Message::ToggleReflection => {
                self.state.toggle_reflection();
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let body = match self.state.status() {
            Status::Loading => self.view_loading(),
            Status::Failed(message) => self.view_error(message),
            Status::Ready => self.view_schedule(),
        };

        let page = scrollable(
            column![
                self.view_header(),
                Space::new().height(24),
                body,
                Space::new().height(24),
                self.view_quote(),
            ]
            .max_width(self.config.window.width)
            .padding(30),
        )
        .width(Length::Fill)
        .height(Length::Fill);

        let app_layout = container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(style::BG_DARK.into()),
                ..Default::default()
            });

        if self.state.modal().open {
            // Presses on the card's empty space count as leaving the city field;
            // presses on the backdrop around it close the dialog
            let card = mouse_area(self.view_modal()).on_press(Message::PointerPressed);
            let backdrop = container(card)
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Alignment::Center)
                .padding(40)
                .style(|_| container::Style {
                    background: Some(style::MODAL_BACKDROP.into()),
                    ..Default::default()
                });
            let backdrop = mouse_area(backdrop).on_press(Message::CloseModal);
            stack![app_layout, backdrop].into()
        } else {
            app_layout.into()
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let classify_interval = Duration::from_secs(self.config.refresh.classify_interval_secs);

        let subs = vec![
            iced::time::every(classify_interval).map(|_| Message::Tick),
            iced::event::listen_with(|event, status, _window_id| map_event(event, status)),
        ];
        Subscription::batch(subs)
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    // --- VIEW COMPONENTS ---

    fn view_header(&self) -> Element<'_, Message> {
        let title = column![
            text("Prayer Times").size(30).color(style::TEXT_BRIGHT),
            text(self.state.date_line()).size(14).color(style::TEXT_MUTED),
        ]
        .spacing(4);

        let location = row![
            text("📍").size(14),
            text(self.state.location_label().to_string())
                .size(15)
                .color(style::ACCENT_BLUE),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let refresh = button(text("↻").size(18))
            .on_press_maybe((*self.state.status() != Status::Loading).then_some(Message::Refresh))
            .padding(10)
            .style(secondary_btn_style);

        let change = button(text("Change location").size(14))
            .on_press(Message::OpenModal)
            .padding([10, 16])
            .style(primary_btn_style);

        row![
            title,
            Space::new().width(Length::Fill),
            column![location, row![change, refresh].spacing(8)]
                .spacing(10)
                .align_x(Alignment::End),
        ]
        .align_y(Alignment::Center)
        .into()
    }

    fn view_loading(&self) -> Element<'_, Message> {
        card_container(center(
            text("Loading prayer times...")
                .size(16)
                .color(style::TEXT_MUTED),
        ))
        .width(Length::Fill)
        .height(Length::Fixed(200.0))
        .into()
    }

    fn view_error<'a>(&'a self, message: &'a str) -> Element<'a, Message> {
        card_container(
            column![
                text("!").size(28).color(style::ACCENT_RED),
                text(message).size(15).color(style::TEXT_BRIGHT),
                button(text("Try again").size(14))
                    .on_press(Message::Retry)
                    .padding([10, 20])
                    .style(primary_btn_style),
            ]
            .spacing(14)
            .align_x(Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
    }

    fn view_schedule(&self) -> Element<'_, Message> {
        let (Some(located), Some(status)) = (self.state.located(), self.state.prayer_status())
        else {
            return self.view_loading();
        };
        let countdown = self
            .state
            .countdown()
            .map(format_countdown)
            .unwrap_or_default();

        let mut cards = Column::new().spacing(10).width(Length::Fill);
        for (prayer, time) in located.schedule.iter() {
            let is_current = status.current == Some(prayer);
            let is_next = status.next == prayer;
            cards = cards.push(prayer_card(prayer, time, is_current, is_next, &countdown));
        }

        let dial = Canvas::new(DayDial {
            schedule: &located.schedule,
            status,
            now: self.services.now_local().time(),
            countdown: countdown.clone(),
            cache: &self.dial_cache,
        })
        .width(Length::Fixed(240.0))
        .height(Length::Fixed(240.0));

        row![cards, card_container(dial)]
            .spacing(20)
            .align_y(Alignment::Center)
            .into()
    }

    fn view_quote(&self) -> Element<'_, Message> {
        let quote_state = self.state.quote();
        let header = row![
            text("Verse of the Moment").size(18).color(style::TEXT_BRIGHT),
            Space::new().width(Length::Fill),
            button(text("New verse").size(13))
                .on_press(Message::NewQuote)
                .padding([6, 12])
                .style(secondary_btn_style),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let Some(quote) = quote_state.current() else {
            let message = quote_state.error_message().unwrap_or_default();
            return card_container(
                column![header, text(message).size(14).color(style::ACCENT_RED)].spacing(16),
            )
            .width(Length::Fill)
            .into();
        };

        let mut content = column![
            header,
            text(format!("\"{}\"", quote.original))
                .size(22)
                .color(style::TEXT_BRIGHT),
            text(format!("\"{}\"", quote.translation))
                .size(15)
                .color(style::TEXT_BRIGHT),
            text(quote.reference).size(13).color(style::ACCENT_BLUE),
        ]
        .spacing(12);

        if quote_state.reflection_visible() {
            content = content.push(
                column![
                    text("Reflection:").size(13).color(style::TEXT_MUTED),
                    text(quote.reflection).size(14).color(style::TEXT_BRIGHT),
                ]
                .spacing(4),
            );
        }

        content = content.push(
            button(text(quote_state.toggle_label()).size(13))
                .on_press(Message::ToggleReflection)
                .padding([6, 12])
                .style(secondary_btn_style),
        );

        card_container(content).width(Length::Fill).into()
    }

    fn view_modal(&self) -> Element<'_, Message> {
        let modal = self.state.modal();

        let header = row![
            text("Change location").size(20).color(style::TEXT_BRIGHT),
            Space::new().width(Length::Fill),
            button(text("✕").size(14))
                .on_press(Message::CloseModal)
                .padding([4, 10])
                .style(secondary_btn_style),
        ]
        .align_y(Alignment::Center);

        let tab_btn = |label: &'static str, tab: ModalTab| {
            let active = modal.tab == tab;
            button(text(label).size(14))
                .on_press(Message::SwitchTab(tab))
                .padding([8, 16])
                .style(move |theme, status| {
                    if active {
                        primary_btn_style(theme, status)
                    } else {
                        secondary_btn_style(theme, status)
                    }
                })
        };
        let tabs = row![
            tab_btn("Search city", ModalTab::City),
            tab_btn("Coordinates", ModalTab::Coordinates),
        ]
        .spacing(8);

        let body = match modal.tab {
            ModalTab::City => self.view_city_tab(),
            ModalTab::Coordinates => self.view_coordinates_tab(),
        };

        let mut errors = Column::new().spacing(8);
        for error in &modal.errors {
            errors = errors.push(
                container(text(error.message.as_str()).size(13).color(style::ACCENT_RED))
                    .padding(10)
                    .width(Length::Fill)
                    .style(|_| container::Style {
                        background: Some(style::ERROR_BG.into()),
                        border: Border {
                            color: style::ACCENT_RED,
                            width: 1.0,
                            radius: 8.0.into(),
                        },
                        ..Default::default()
                    }),
            );
        }

        card_container(column![header, tabs, body, errors].spacing(18))
            .max_width(520.0)
            .into()
    }

    fn view_city_tab(&self) -> Element<'_, Message> {
        let modal = self.state.modal();
        let autocomplete = self.state.autocomplete();

        let input = styled_input("Enter city name", &modal.city_input)
            .on_input(Message::CityInputChanged)
            .on_submit(Message::CitySubmitted);

        let search_label = if modal.searching { "Searching..." } else { "Search" };
        let search = button(text(search_label).size(14))
            .on_press_maybe((!modal.searching).then_some(Message::SearchCity))
            .padding([8, 16])
            .style(primary_btn_style);

        let mut content = column![row![input, search].spacing(8)].spacing(6);

        if autocomplete.is_visible() {
            let mut list = Column::new().spacing(2);
            for (index, suggestion) in autocomplete.suggestions().iter().enumerate() {
                let highlighted = autocomplete.highlighted() == Some(index);
                list = list.push(
                    result_row(suggestion, highlighted).on_press(Message::SuggestionPicked(index)),
                );
            }
            content = content.push(
                container(list)
                    .padding(4)
                    .style(|_| container::Style {
                        background: Some(style::BG_DARK.into()),
                        border: Border {
                            color: style::STROKE_DIM,
                            width: 1.0,
                            radius: 8.0.into(),
                        },
                        ..Default::default()
                    }),
            );
        }

        if !modal.results.is_empty() {
            let mut list = Column::new().spacing(4);
            for (index, result) in modal.results.iter().enumerate() {
                list = list.push(result_row(result, false).on_press(Message::ResultSelected(index)));
            }
            content = content.push(Space::new().height(10));
            content = content.push(text("Search results").size(13).color(style::TEXT_MUTED));
            content = content.push(scrollable(list).height(Length::Fixed(260.0)));
        }

        content.into()
    }

    fn view_coordinates_tab(&self) -> Element<'_, Message> {
        let modal = self.state.modal();

        let latitude = styled_input("Latitude (-90 to 90)", &modal.latitude_input)
            .on_input(Message::LatitudeChanged)
            .on_submit(Message::UseCoordinates);
        let longitude = styled_input("Longitude (-180 to 180)", &modal.longitude_input)
            .on_input(Message::LongitudeChanged)
            .on_submit(Message::UseCoordinates);

        let label = if modal.validating {
            "Checking..."
        } else {
            "Use coordinates"
        };
        let submit = button(text(label).size(14))
            .on_press_maybe((!modal.validating).then_some(Message::UseCoordinates))
            .padding([8, 16])
            .style(primary_btn_style);

        column![row![latitude, longitude].spacing(8), submit]
            .spacing(12)
            .into()
    }

    // --- LOGIC HELPERS ---

    fn locate(&mut self) -> Task<Message> {
        let id = self.state.begin_locate();
        let services = self.services.clone();
        Task::perform(
            async move { services.acquire_current_location().await },
            move |r| Message::Located(id, r),
        )
    }

    fn fetch_schedule(&mut self, location: Location) -> Task<Message> {
        let id = self.state.begin_schedule_fetch(location.clone());
        let services = self.services.clone();
        Task::perform(
            async move { services.fetch_schedule(&location).await },
            move |r| Message::ScheduleLoaded(id, r),
        )
    }

    fn search_city(&mut self) -> Task<Message> {
        if self.state.modal().searching {
            return Task::none();
        }
        match self.state.begin_city_search() {
            Ok((id, text)) => {
                let services = self.services.clone();
                Task::perform(
                    async move { services.search(&text).await },
                    move |r| Message::SearchCompleted(id, r),
                )
            }
            Err(error) => self.expire_modal_error(error),
        }
    }

    fn expire_modal_error(&self, id: ErrorId) -> Task<Message> {
        let after = Duration::from_secs(self.config.refresh.modal_error_secs);
        Task::perform(
            async move { tokio::time::sleep(after).await },
            move |_| Message::DismissModalError(id),
        )
    }
}

fn prayer_card<'a>(
    prayer: Prayer,
    time: chrono::NaiveTime,
    is_current: bool,
    is_next: bool,
    countdown: &str,
) -> Element<'a, Message> {
    let (background, accent, badge) = if is_current {
        (style::BG_CARD_ACTIVE, style::ACCENT_GREEN, "Now")
    } else if is_next {
        (style::BG_CARD_NEXT, style::ACCENT_ORANGE, "Next")
    } else {
        (style::BG_CARD, style::STROKE_DIM, "")
    };

    let mut right = column![
        text(format_twelve_hour(time))
            .size(20)
            .font(iced::font::Font::MONOSPACE)
            .color(style::TEXT_BRIGHT)
    ]
    .align_x(Alignment::End);
    if is_next && !countdown.is_empty() {
        right = right.push(
            text(format!("in {}", countdown))
                .size(12)
                .color(style::ACCENT_ORANGE),
        );
    }

    container(
        row![
            text(prayer.to_string()).size(18).color(style::TEXT_BRIGHT),
            Space::new().width(10),
            text(badge).size(12).color(accent),
            Space::new().width(Length::Fill),
            right,
        ]
        .align_y(Alignment::Center),
    )
    .padding([14, 20])
    .width(Length::Fill)
    .style(move |_| container::Style {
        background: Some(background.into()),
        border: Border {
            color: accent,
            width: if badge.is_empty() { 0.0 } else { 1.0 },
            radius: 12.0.into(),
        },
        ..Default::default()
    })
    .into()
}

fn result_row(result: &SearchResult, highlighted: bool) -> button::Button<'_, Message> {
    let details = result.details();
    let mut name_col = column![text(result.name.as_str()).size(14).color(style::TEXT_BRIGHT)];
    if !details.is_empty() {
        name_col = name_col.push(text(details).size(12).color(style::TEXT_MUTED));
    }

    button(
        row![
            name_col,
            Space::new().width(Length::Fill),
            text(result.coordinates_label())
                .size(11)
                .font(iced::font::Font::MONOSPACE)
                .color(style::TEXT_MUTED),
        ]
        .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .padding([8, 12])
    .style(move |_, status| {
        let hovered = matches!(status, button::Status::Hovered | button::Status::Pressed);
        button::Style {
            background: Some(if highlighted || hovered {
                style::BG_CARD_ACTIVE.into()
            } else {
                Color::TRANSPARENT.into()
            }),
            text_color: style::TEXT_BRIGHT,
            border: Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    })
}

fn card_container<'a>(
    content: impl Into<Element<'a, Message>>,
) -> container::Container<'a, Message> {
    container(content).padding(24).style(|_| container::Style {
        background: Some(style::BG_CARD.into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 16.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
            offset: Vector::new(0.0, 4.0),
            blur_radius: 10.0,
        },
        ..Default::default()
    })
}

fn styled_input<'a>(placeholder: &'a str, val: &'a str) -> text_input::TextInput<'a, Message> {
    text_input(placeholder, val)
        .padding(10)
        .width(Length::Fill)
        .size(14)
        .style(|_, status| {
            let border_color = if matches!(status, text_input::Status::Focused { .. }) {
                style::ACCENT_BLUE
            } else {
                style::STROKE_DIM
            };
            text_input::Style {
                background: style::BG_DARK.into(),
                border: Border {
                    color: border_color,
                    width: 1.0,
                    radius: 6.0.into(),
                },
                icon: style::TEXT_MUTED,
                placeholder: style::TEXT_MUTED,
                value: style::TEXT_BRIGHT,
                selection: style::ACCENT_BLUE,
            }
        })
}

/// Global events the app listens to. A press that a widget already handled
/// (the city field itself, a suggestion, a button) is not a blur.
fn map_event(event: iced::Event, status: iced::event::Status) -> Option<Message> {
    match event {
        iced::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => match key {
            keyboard::Key::Named(keyboard::key::Named::ArrowDown) => {
                Some(Message::KeyPressed(NavKey::Down))
            }
            keyboard::Key::Named(keyboard::key::Named::ArrowUp) => {
                Some(Message::KeyPressed(NavKey::Up))
            }
            keyboard::Key::Named(keyboard::key::Named::Escape) => {
                Some(Message::KeyPressed(NavKey::Escape))
            }
            _ => None,
        },
        iced::Event::Mouse(iced::mouse::Event::ButtonPressed(iced::mouse::Button::Left))
            if matches!(status, iced::event::Status::Ignored) =>
        {
            Some(Message::PointerPressed)
        }
        _ => None,
    }
}

fn primary_btn_style(_: &Theme, _: button::Status) -> button::Style {
    button::Style {
        background: Some(style::ACCENT_BLUE.into()),
        text_color: style::BG_DARK,
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn secondary_btn_style(_: &Theme, _: button::Status) -> button::Style {
    button::Style {
        background: Some(style::BG_DARK.into()),
        text_color: style::TEXT_BRIGHT,
        border: Border {
            radius: 6.0.into(),
            color: style::STROKE_DIM,
            width: 1.0,
        },
        ..Default::default()
    }
}
