//! Application state and its transitions.
//!
//! All transitions are synchronous. Network work is started by the caller
//! with the request id a `begin_*` method hands out and reported back through
//! the matching `*_finished` method; completions carrying a superseded id are
//! discarded.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;

use crate::{
    autocomplete::{Autocomplete, SuggestionQuery},
    config::AutocompleteConfig,
    error::{AppError, LocationError},
    model::{Coordinates, Location, PrayerSchedule, SearchResult},
    quotes::{QuoteState, pick_random_quote},
    schedule::{PrayerStatus, classify_prayers, format_long_date, time_until},
};

pub const LOCATION_FAILED: &str =
    "Unable to get your location. Please allow location access and try again.";
pub const SCHEDULE_FAILED: &str =
    "Unable to fetch prayer times. Please check your internet connection and try again.";
pub const CITY_REQUIRED: &str = "Please enter a city name";
pub const NO_LOCATIONS: &str = "No locations found. Please try a different search term.";
pub const SEARCH_FAILED: &str =
    "Search failed. Please check your internet connection and try again.";
pub const INVALID_COORDINATES: &str =
    "Invalid coordinates. Please enter coordinates for a valid location.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalTab {
    #[default]
    City,
    Coordinates,
}

/// Handle for an inline modal error, used to dismiss it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ModalError {
    pub id: ErrorId,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub open: bool,
    pub tab: ModalTab,
    pub city_input: String,
    pub latitude_input: String,
    pub longitude_input: String,
    pub results: Vec<SearchResult>,
    pub searching: bool,
    pub validating: bool,
    pub errors: Vec<ModalError>,
}

/// A schedule together with the location it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub location: Location,
    pub schedule: PrayerSchedule,
}

/// What a refresh should do.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshAction {
    Fetch(Location),
    Locate,
}

#[derive(Debug, Clone, Default)]
struct Pending {
    locate: Option<u64>,
    schedule: Option<(u64, Location)>,
    search: Option<u64>,
    coordinates: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    located: Option<Located>,
    /// Most recently chosen location, even if its fetch failed.
    target: Option<Location>,
    status: Status,
    now: NaiveDateTime,
    prayer_status: Option<PrayerStatus>,
    countdown: Option<Duration>,
    quote: QuoteState,
    modal: ModalState,
    autocomplete: Autocomplete,
    pending: Pending,
    next_request: u64,
    next_error: u64,
}

impl AppState {
    pub fn new(now: NaiveDateTime, autocomplete: &AutocompleteConfig) -> Self {
        Self {
            located: None,
            target: None,
            status: Status::Loading,
            now,
            prayer_status: None,
            countdown: None,
            quote: QuoteState::default(),
            modal: ModalState::default(),
            autocomplete: Autocomplete::new(autocomplete),
            pending: Pending::default(),
            next_request: 0,
            next_error: 0,
        }
    }

    // --- READ ACCESS ---

    pub fn located(&self) -> Option<&Located> {
        self.located.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn prayer_status(&self) -> Option<PrayerStatus> {
        self.prayer_status
    }

    pub fn countdown(&self) -> Option<Duration> {
        self.countdown
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn date_line(&self) -> String {
        format_long_date(self.today())
    }

    pub fn quote(&self) -> &QuoteState {
        &self.quote
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    /// Header label: the location the displayed schedule belongs to.
    pub fn location_label(&self) -> &str {
        match &self.located {
            Some(located) => &located.location.display_name,
            None if self.status == Status::Loading => "Detecting location...",
            None => "Location unavailable",
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_request += 1;
        self.next_request
    }

    // --- LOCATION & SCHEDULE ---

    pub fn begin_locate(&mut self) -> u64 {
        let id = self.next_id();
        self.pending.locate = Some(id);
        self.pending.schedule = None;
        self.status = Status::Loading;
        id
    }

    /// Returns the location to fetch a schedule for on success.
    pub fn locate_finished(
        &mut self,
        id: u64,
        result: Result<Location, LocationError>,
    ) -> Option<Location> {
        if self.pending.locate != Some(id) {
            tracing::debug!("Ignoring stale locate response {}", id);
            return None;
        }
        self.pending.locate = None;
        match result {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::error!("Location error: {}", e);
                self.status = Status::Failed(LOCATION_FAILED.to_string());
                None
            }
        }
    }

    pub fn begin_schedule_fetch(&mut self, location: Location) -> u64 {
        let id = self.next_id();
        self.pending.locate = None;
        self.target = Some(location.clone());
        self.pending.schedule = Some((id, location));
        self.status = Status::Loading;
        id
    }

    /// Store the schedule with the location it was requested for and
    /// classify it right away. Returns `false` for a stale response.
    pub fn schedule_finished(
        &mut self,
        id: u64,
        result: Result<PrayerSchedule, AppError>,
        now: NaiveDateTime,
    ) -> bool {
        let location = match self.pending.schedule.take() {
            Some((pending, location)) if pending == id => location,
            other => {
                self.pending.schedule = other;
                tracing::debug!("Ignoring stale schedule response {}", id);
                return false;
            }
        };

        match result {
            Ok(schedule) => {
                tracing::info!("Prayer times updated for {}", location.display_name);
                self.located = Some(Located { location, schedule });
                self.status = Status::Ready;
                self.tick(now);
            }
            Err(e) => {
                tracing::error!("Prayer times fetch error: {}", e);
                self.status = Status::Failed(SCHEDULE_FAILED.to_string());
            }
        }
        true
    }

    pub fn refresh(&self) -> RefreshAction {
        match &self.target {
            Some(location) => RefreshAction::Fetch(location.clone()),
            None => RefreshAction::Locate,
        }
    }

    /// Re-run classification and move the date line forward. No I/O.
    ///
    /// Returns a fetch for the displayed location once the local date has
    /// moved past the schedule's date. Nothing is returned while another
    /// request is in flight or after a failure, which waits for the user.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<RefreshAction> {
        self.now = now;
        let Some(located) = &self.located else {
            self.prayer_status = None;
            self.countdown = None;
            return None;
        };

        let status = classify_prayers(&located.schedule, now.time());
        self.countdown = Some(time_until(&located.schedule, status.next, now.time()));
        self.prayer_status = Some(status);

        let idle = self.pending.locate.is_none() && self.pending.schedule.is_none();
        if now.date() != located.schedule.date && idle && self.status == Status::Ready {
            tracing::info!("Local date is now {}, refreshing prayer times", now.date());
            return Some(RefreshAction::Fetch(located.location.clone()));
        }
        None
    }

    // --- MODAL ---

    pub fn open_modal(&mut self) {
        self.modal.open = true;
    }

    /// Close and reset the dialog. In-flight modal requests are abandoned.
    pub fn close_modal(&mut self) {
        self.modal = ModalState {
            tab: self.modal.tab,
            ..ModalState::default()
        };
        self.autocomplete.dismiss();
        self.pending.search = None;
        self.pending.coordinates = None;
    }

    pub fn switch_tab(&mut self, tab: ModalTab) {
        self.modal.tab = tab;
        if tab != ModalTab::City {
            self.autocomplete.dismiss();
        }
    }

    pub fn push_modal_error(&mut self, message: impl Into<String>) -> ErrorId {
        self.next_error += 1;
        let id = ErrorId(self.next_error);
        self.modal.errors.push(ModalError {
            id,
            message: message.into(),
        });
        id
    }

    pub fn dismiss_modal_error(&mut self, id: ErrorId) {
        self.modal.errors.retain(|e| e.id != id);
    }

    // --- CITY SEARCH ---

    pub fn city_input_changed(&mut self, text: String) -> Option<SuggestionQuery> {
        let query = self.autocomplete.input_changed(&text);
        self.modal.city_input = text;
        query
    }

    pub fn suggestions_arrived(
        &mut self,
        generation: u64,
        result: Result<Vec<SearchResult>, AppError>,
    ) -> bool {
        self.autocomplete.results_arrived(generation, result)
    }

    pub fn highlight_next_suggestion(&mut self) {
        self.autocomplete.highlight_next();
    }

    pub fn highlight_previous_suggestion(&mut self) {
        self.autocomplete.highlight_previous();
    }

    pub fn dismiss_suggestions(&mut self) {
        self.autocomplete.dismiss();
    }

    pub fn city_field_blurred(&mut self) -> u64 {
        self.autocomplete.blur()
    }

    pub fn blur_grace_elapsed(&mut self, token: u64) {
        self.autocomplete.blur_elapsed(token);
    }

    /// Enter on a highlighted suggestion. `None` when nothing is highlighted.
    pub fn confirm_suggestion(&mut self) -> Option<Location> {
        let chosen = self.autocomplete.confirm()?;
        Some(self.select_result(&chosen))
    }

    pub fn pick_suggestion(&mut self, index: usize) -> Option<Location> {
        let chosen = self.autocomplete.pick(index)?;
        Some(self.select_result(&chosen))
    }

    /// Validate the city field and start an explicit search.
    pub fn begin_city_search(&mut self) -> Result<(u64, String), ErrorId> {
        let text = self.modal.city_input.trim().to_string();
        if text.is_empty() {
            return Err(self.push_modal_error(CITY_REQUIRED));
        }
        let id = self.next_id();
        self.pending.search = Some(id);
        self.modal.searching = true;
        self.modal.results.clear();
        self.autocomplete.dismiss();
        Ok((id, text))
    }

    /// Returns the id of an inline error raised by the outcome, if any.
    pub fn city_search_finished(
        &mut self,
        id: u64,
        result: Result<Vec<SearchResult>, AppError>,
    ) -> Option<ErrorId> {
        if self.pending.search != Some(id) {
            tracing::debug!("Ignoring stale search response {}", id);
            return None;
        }
        self.pending.search = None;
        self.modal.searching = false;

        match result {
            Ok(results) if results.is_empty() => Some(self.push_modal_error(NO_LOCATIONS)),
            Ok(results) => {
                self.modal.results = results;
                None
            }
            Err(e) => {
                tracing::error!("City search error: {}", e);
                Some(self.push_modal_error(SEARCH_FAILED))
            }
        }
    }

    /// Close the dialog and return the chosen place.
    pub fn select_result(&mut self, result: &SearchResult) -> Location {
        self.close_modal();
        result.to_location()
    }

    // --- COORDINATES ---

    pub fn set_latitude_input(&mut self, text: String) {
        self.modal.latitude_input = text;
    }

    pub fn set_longitude_input(&mut self, text: String) {
        self.modal.longitude_input = text;
    }

    /// Validate the coordinate fields and start place validation.
    pub fn parse_coordinates(&mut self) -> Result<(u64, Coordinates), ErrorId> {
        match Coordinates::parse(&self.modal.latitude_input, &self.modal.longitude_input) {
            Ok(coordinates) => {
                let id = self.next_id();
                self.pending.coordinates = Some(id);
                self.modal.validating = true;
                Ok((id, coordinates))
            }
            Err(e) => Err(self.push_modal_error(e.to_string())),
        }
    }

    /// `None` for a stale response; otherwise the validated location (modal
    /// closed) or the id of the inline error shown.
    pub fn coordinates_finished(
        &mut self,
        id: u64,
        result: Result<Location, AppError>,
    ) -> Option<Result<Location, ErrorId>> {
        if self.pending.coordinates != Some(id) {
            tracing::debug!("Ignoring stale coordinates response {}", id);
            return None;
        }
        self.pending.coordinates = None;
        self.modal.validating = false;

        Some(match result {
            Ok(location) => {
                self.close_modal();
                Ok(location)
            }
            Err(e) => {
                tracing::warn!("Coordinates rejected: {}", e);
                Err(self.push_modal_error(INVALID_COORDINATES))
            }
        })
    }

    // --- QUOTE ---

    pub fn new_quote<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.quote.show(pick_random_quote(rng));
    }

    pub fn toggle_reflection(&mut self) {
        self.quote.toggle_reflection();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::model::Prayer;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn state() -> AppState {
        AppState::new(at(9, 0), &AutocompleteConfig::default())
    }

    fn mecca() -> Location {
        Location::new(Coordinates::new(21.4225, 39.8262).unwrap(), "Mecca, Saudi Arabia")
    }

    fn paris() -> Location {
        Location::new(Coordinates::new(48.8566, 2.3522).unwrap(), "Paris, France")
    }

    fn schedule_for(location: &Location) -> PrayerSchedule {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        PrayerSchedule::new(
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            location.coordinates,
            [t(5, 0), t(12, 0), t(15, 30), t(18, 0), t(19, 30)],
        )
    }

    fn search_result(name: &str) -> SearchResult {
        SearchResult {
            name: name.into(),
            display_name: format!("{}, Region, Country", name),
            latitude: 10.0,
            longitude: 20.0,
            place_type: "city".into(),
            importance: 0.6,
        }
    }

    // ==================== Locate & Fetch Tests ====================

    #[test]
    fn test_initial_state_is_loading() {
        let s = state();
        assert_eq!(s.status(), &Status::Loading);
        assert!(s.located().is_none());
        assert_eq!(s.refresh(), RefreshAction::Locate);
        assert_eq!(s.date_line(), "Sunday, October 18, 2026");
    }

    #[test]
    fn test_locate_then_fetch_classifies_immediately() {
        let mut s = state();
        let id = s.begin_locate();
        let location = s.locate_finished(id, Ok(mecca())).unwrap();

        let fetch = s.begin_schedule_fetch(location.clone());
        assert!(s.schedule_finished(fetch, Ok(schedule_for(&location)), at(13, 0)));

        assert_eq!(s.status(), &Status::Ready);
        assert_eq!(s.location_label(), "Mecca, Saudi Arabia");
        let status = s.prayer_status().unwrap();
        assert_eq!(status.current, Some(Prayer::Dhuhr));
        assert_eq!(status.next, Prayer::Asr);
        assert_eq!(s.countdown(), Some(Duration::minutes(150)));
    }

    #[test]
    fn test_locate_failure_shows_message() {
        let mut s = state();
        let id = s.begin_locate();
        assert!(s.locate_finished(id, Err(LocationError::PermissionDenied)).is_none());
        assert_eq!(s.status(), &Status::Failed(LOCATION_FAILED.to_string()));
    }

    #[test]
    fn test_schedule_failure_shows_message_and_keeps_target() {
        let mut s = state();
        let id = s.begin_schedule_fetch(paris());
        s.schedule_finished(id, Err(AppError::network("status 500")), at(9, 0));
        assert_eq!(s.status(), &Status::Failed(SCHEDULE_FAILED.to_string()));
        assert_eq!(s.refresh(), RefreshAction::Fetch(paris()));
    }

    #[test]
    fn test_stale_schedule_is_discarded() {
        let mut s = state();
        let first = s.begin_schedule_fetch(mecca());
        let second = s.begin_schedule_fetch(paris());

        assert!(s.schedule_finished(second, Ok(schedule_for(&paris())), at(9, 0)));
        assert!(!s.schedule_finished(first, Ok(schedule_for(&mecca())), at(9, 0)));

        let located = s.located().unwrap();
        assert_eq!(located.location, paris());
        assert_eq!(located.schedule.coordinates, paris().coordinates);
    }

    #[test]
    fn test_label_stays_with_displayed_schedule_while_loading() {
        let mut s = state();
        let id = s.begin_schedule_fetch(mecca());
        s.schedule_finished(id, Ok(schedule_for(&mecca())), at(9, 0));

        s.begin_schedule_fetch(paris());
        assert_eq!(s.status(), &Status::Loading);
        assert_eq!(s.location_label(), "Mecca, Saudi Arabia");
    }

    #[test]
    fn test_locate_response_after_manual_choice_is_ignored() {
        let mut s = state();
        let locate = s.begin_locate();
        s.begin_schedule_fetch(paris());
        assert!(s.locate_finished(locate, Ok(mecca())).is_none());
    }

    #[test]
    fn test_tick_reclassifies_without_refetch() {
        let mut s = state();
        let id = s.begin_schedule_fetch(mecca());
        s.schedule_finished(id, Ok(schedule_for(&mecca())), at(13, 0));

        s.tick(at(20, 0));
        let status = s.prayer_status().unwrap();
        assert_eq!(status.current, Some(Prayer::Isha));
        assert_eq!(status.next, Prayer::Fajr);
        assert_eq!(s.countdown(), Some(Duration::hours(9)));
    }

    #[test]
    fn test_tick_requests_fetch_after_midnight() {
        let mut s = state();
        let id = s.begin_schedule_fetch(mecca());
        s.schedule_finished(id, Ok(schedule_for(&mecca())), at(23, 0));
        assert_eq!(s.tick(at(23, 59)), None);

        let after_midnight = at(23, 59) + Duration::minutes(2);
        assert_eq!(s.tick(after_midnight), Some(RefreshAction::Fetch(mecca())));
        assert_eq!(s.date_line(), "Monday, October 19, 2026");

        // Only one fetch while it is in flight
        s.begin_schedule_fetch(mecca());
        assert_eq!(s.tick(after_midnight + Duration::minutes(1)), None);
    }

    #[test]
    fn test_tick_after_failed_rollover_waits_for_user() {
        let mut s = state();
        let id = s.begin_schedule_fetch(mecca());
        s.schedule_finished(id, Ok(schedule_for(&mecca())), at(23, 0));

        let next_day = at(23, 0) + Duration::hours(2);
        let id = s.begin_schedule_fetch(mecca());
        s.schedule_finished(id, Err(AppError::network("offline")), next_day);
        assert_eq!(s.tick(next_day + Duration::minutes(1)), None);
    }

    #[test]
    fn test_tick_moves_date_line() {
        let mut s = state();
        s.tick(at(23, 59) + Duration::minutes(1));
        assert_eq!(s.date_line(), "Monday, October 19, 2026");
    }

    // ==================== Modal Tests ====================

    #[test]
    fn test_close_modal_clears_inputs_and_results() {
        let mut s = state();
        s.open_modal();
        s.switch_tab(ModalTab::Coordinates);
        s.set_latitude_input("12".into());
        s.city_input_changed("Par".into());
        s.modal.results.push(search_result("Paris"));

        s.close_modal();
        let modal = s.modal();
        assert!(!modal.open);
        assert!(modal.city_input.is_empty());
        assert!(modal.latitude_input.is_empty());
        assert!(modal.results.is_empty());
        assert!(!s.autocomplete().is_visible());
    }

    #[test]
    fn test_empty_city_is_rejected_inline() {
        let mut s = state();
        s.open_modal();
        s.city_input_changed("   ".into());
        let err = s.begin_city_search().unwrap_err();
        assert_eq!(s.modal().errors[0].message, CITY_REQUIRED);
        assert!(s.modal().open);

        s.dismiss_modal_error(err);
        assert!(s.modal().errors.is_empty());
    }

    #[test]
    fn test_city_search_outcomes() {
        let mut s = state();
        s.open_modal();
        s.city_input_changed("Paris".into());

        let (id, text) = s.begin_city_search().unwrap();
        assert_eq!(text, "Paris");
        assert!(s.modal().searching);
        assert!(s.city_search_finished(id, Ok(vec![search_result("Paris")])).is_none());
        assert_eq!(s.modal().results.len(), 1);
        assert!(!s.modal().searching);

        let (id, _) = s.begin_city_search().unwrap();
        s.city_search_finished(id, Ok(vec![])).unwrap();
        assert_eq!(s.modal().errors.last().unwrap().message, NO_LOCATIONS);

        let (id, _) = s.begin_city_search().unwrap();
        s.city_search_finished(id, Err(AppError::network("offline")))
            .unwrap();
        assert_eq!(s.modal().errors.last().unwrap().message, SEARCH_FAILED);
    }

    #[test]
    fn test_stale_city_search_is_ignored() {
        let mut s = state();
        s.city_input_changed("Paris".into());
        let (first, _) = s.begin_city_search().unwrap();
        let (second, _) = s.begin_city_search().unwrap();

        s.city_search_finished(second, Ok(vec![search_result("Paris")]));
        assert!(s.city_search_finished(first, Err(AppError::network("late"))).is_none());
        assert_eq!(s.modal().results[0].name, "Paris");
        assert!(s.modal().errors.is_empty());
    }

    #[test]
    fn test_select_result_closes_modal() {
        let mut s = state();
        s.open_modal();
        let location = s.select_result(&search_result("Lyon"));
        assert_eq!(location.display_name, "Lyon");
        assert!(!s.modal().open);
    }

    #[test]
    fn test_suggestion_enter_selects_location() {
        let mut s = state();
        s.open_modal();
        let query = s.city_input_changed("Ly".into()).unwrap();
        s.suggestions_arrived(query.generation, Ok(vec![search_result("Lyon")]));

        s.highlight_next_suggestion();
        let location = s.confirm_suggestion().unwrap();
        assert_eq!(location.display_name, "Lyon");
        assert!(!s.modal().open);
    }

    // ==================== Coordinates Tests ====================

    #[test]
    fn test_coordinate_range_errors_are_specific() {
        let mut s = state();
        s.set_latitude_input("91".into());
        s.set_longitude_input("0".into());
        s.parse_coordinates().unwrap_err();
        assert_eq!(
            s.modal().errors[0].message,
            "Latitude must be between -90 and 90"
        );

        s.set_latitude_input("10".into());
        s.set_longitude_input("200".into());
        s.parse_coordinates().unwrap_err();
        assert_eq!(
            s.modal().errors[1].message,
            "Longitude must be between -180 and 180"
        );

        s.set_latitude_input("north".into());
        s.parse_coordinates().unwrap_err();
        assert_eq!(s.modal().errors[2].message, "Please enter valid coordinates");
    }

    #[test]
    fn test_valid_coordinates_proceed_to_validation() {
        let mut s = state();
        s.open_modal();
        s.set_latitude_input("45".into());
        s.set_longitude_input("45".into());
        let (id, coordinates) = s.parse_coordinates().unwrap();
        assert_eq!(coordinates, Coordinates::new(45.0, 45.0).unwrap());
        assert!(s.modal().validating);

        let location = Location::new(coordinates, "Somewhere, Georgia");
        let done = s.coordinates_finished(id, Ok(location.clone())).unwrap();
        assert_eq!(done, Ok(location));
        assert!(!s.modal().open);
    }

    #[test]
    fn test_invalid_place_keeps_modal_open() {
        let mut s = state();
        s.open_modal();
        s.set_latitude_input("0".into());
        s.set_longitude_input("-30".into());
        let (id, _) = s.parse_coordinates().unwrap();

        let outcome = s.coordinates_finished(id, Err(AppError::InvalidPlace)).unwrap();
        assert!(outcome.is_err());
        assert!(s.modal().open);
        assert_eq!(s.modal().errors[0].message, INVALID_COORDINATES);
    }

    #[test]
    fn test_coordinates_response_after_close_is_ignored() {
        let mut s = state();
        s.open_modal();
        s.set_latitude_input("45".into());
        s.set_longitude_input("45".into());
        let (id, coordinates) = s.parse_coordinates().unwrap();
        s.close_modal();
        assert!(s
            .coordinates_finished(id, Ok(Location::new(coordinates, "X")))
            .is_none());
    }

    // ==================== Quote Tests ====================

    #[test]
    fn test_new_quote_resets_reflection() {
        let mut s = state();
        let mut rng = StdRng::seed_from_u64(3);
        s.new_quote(&mut rng);
        assert!(s.quote().current().is_some());

        s.toggle_reflection();
        assert_eq!(s.quote().toggle_label(), "Hide");

        s.new_quote(&mut rng);
        assert_eq!(s.quote().toggle_label(), "Reflection");
    }
}
