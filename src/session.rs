use crate::error::{InputError, PositionError, SessionError};
use crate::form::{ElevationCheck, FormView, validate};
use crate::render::{PopupContent, PopupOptions, TileLayer};
use crate::types::{Coords, Workout};
use crate::{dlog, utils};

pub const DEFAULT_ZOOM: u8 = 15;

/// One-shot position source.
pub trait GeolocationProvider {
    fn request_position(&mut self) -> Result<Coords, PositionError>;
}

pub trait MapProvider {
    type Handle: MapHandle;

    fn create_map(&mut self, center: Coords, zoom: u8, tiles: &TileLayer) -> Self::Handle;
}

pub trait MapHandle {
    /// Start delivering click events for this map to the session.
    fn subscribe_clicks(&mut self);
    fn add_marker(&mut self, at: Coords, popup_text: &str, popup: &PopupOptions);
}

/// Blocking user notice.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub zoom: Option<u8>,
    pub elevation_check: ElevationCheck,
    pub popup_content: PopupContent,
    pub tiles: TileLayer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    PositionAcquired(Coords),
    PositionFailed(PositionError),
    MapClicked(Coords),
    FormSubmitted,
    FormTypeChanged,
}

pub struct Session<M: MapProvider, F: FormView, N: Notifier> {
    options: SessionOptions,
    maps: M,
    form: F,
    notifier: N,
    map: Option<M::Handle>,
    pending: Option<Coords>,
    workouts: Vec<Workout>,
}

impl<M: MapProvider, F: FormView, N: Notifier> Session<M, F, N> {
    pub const fn new(options: SessionOptions, maps: M, form: F, notifier: N) -> Self {
        Self {
            options,
            maps,
            form,
            notifier,
            map: None,
            pending: None,
            workouts: Vec::new(),
        }
    }

    /// Ask the provider for the user's position once and react to the answer.
    pub fn start<G: GeolocationProvider>(&mut self, geo: &mut G) -> Result<(), SessionError> {
        match geo.request_position() {
            Ok(at) => {
                self.on_position(at);
                Ok(())
            }
            Err(e) => Err(self.on_position_failed(e)),
        }
    }

    pub fn handle(&mut self, event: Event) -> Result<(), SessionError> {
        match event {
            Event::PositionAcquired(at) => self.on_position(at),
            Event::PositionFailed(e) => return Err(self.on_position_failed(e)),
            Event::MapClicked(at) => self.on_map_click(at),
            Event::FormSubmitted => {
                self.submit()?;
            }
            Event::FormTypeChanged => self.on_type_change(),
        }
        Ok(())
    }

    pub fn on_position(&mut self, at: Coords) {
        let zoom = self.options.zoom.unwrap_or(DEFAULT_ZOOM);
        tracing::info!(lat = at.lat, lng = at.lng, zoom, "position acquired");
        dlog!("{}", utils::google_maps_link(at));

        let mut map = self.maps.create_map(at, zoom, &self.options.tiles);
        map.subscribe_clicks();
        self.map = Some(map);
    }

    fn on_position_failed(&mut self, e: PositionError) -> SessionError {
        tracing::warn!(err = %e, "could not get position");
        let err = SessionError::from(e);
        self.notifier.alert(err.notice());
        err
    }

    pub fn on_map_click(&mut self, at: Coords) {
        if self.map.is_none() {
            tracing::warn!(lat = at.lat, lng = at.lng, "click ignored: no map loaded");
            return;
        }
        if let Some(prev) = self.pending.replace(at) {
            dlog!("pending location replaced prev={prev} new={at}");
        }
        self.form.reveal();
    }

    pub fn on_type_change(&mut self) {
        dlog!("toggling cadence/elevation rows");
        self.form.toggle_type_rows();
    }

    /// Validate the form and log a workout at the pending location.
    ///
    /// On failure the user is notified and nothing changes.
    pub fn submit(&mut self) -> Result<Workout, SessionError> {
        let workout = match self.build_workout() {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(err = %e, "workout rejected");
                self.notifier.alert(e.notice());
                return Err(e);
            }
        };

        let popup = PopupOptions::for_kind(workout.kind());
        let text = self.options.popup_content.text_for(&workout);
        if let Some(map) = self.map.as_mut() {
            map.add_marker(workout.coords(), &text, &popup);
        }
        self.form.clear_inputs();

        tracing::info!(
            id = %workout.id(),
            kind = %workout.kind(),
            at = %workout.coords(),
            total = self.workouts.len() + 1,
            "workout logged"
        );
        self.workouts.push(workout.clone());
        Ok(workout)
    }

    fn build_workout(&self) -> Result<Workout, SessionError> {
        let at = self.pending.ok_or(InputError::NoPendingLocation)?;
        let input = validate(&self.form.read(), self.options.elevation_check)?;
        Ok(Workout::new(at, input))
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub const fn pending_location(&self) -> Option<Coords> {
        self.pending
    }

    pub const fn map(&self) -> Option<&M::Handle> {
        self.map.as_ref()
    }

    pub const fn form(&self) -> &F {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormField, FormState};
    use crate::types::WorkoutKind;

    #[derive(Default)]
    struct Maps;

    #[derive(Default)]
    struct Handle {
        center: Option<Coords>,
        listening: bool,
        markers: Vec<(Coords, String, PopupOptions)>,
    }

    impl MapProvider for Maps {
        type Handle = Handle;

        fn create_map(&mut self, center: Coords, _zoom: u8, _tiles: &TileLayer) -> Handle {
            Handle {
                center: Some(center),
                ..Handle::default()
            }
        }
    }

    impl MapHandle for Handle {
        fn subscribe_clicks(&mut self) {
            self.listening = true;
        }

        fn add_marker(&mut self, at: Coords, popup_text: &str, popup: &PopupOptions) {
            self.markers.push((at, popup_text.to_string(), popup.clone()));
        }
    }

    #[derive(Default)]
    struct Alerts(Vec<String>);

    impl Notifier for Alerts {
        fn alert(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    struct Fixed(Result<Coords, PositionError>);

    impl GeolocationProvider for Fixed {
        fn request_position(&mut self) -> Result<Coords, PositionError> {
            self.0
        }
    }

    fn session() -> Session<Maps, FormState, Alerts> {
        Session::new(
            SessionOptions::default(),
            Maps,
            FormState::default(),
            Alerts::default(),
        )
    }

    fn fill_running(s: &mut Session<Maps, FormState, Alerts>, d: &str, t: &str, c: &str) {
        let f = s.form_mut();
        f.set(FormField::Type, "running");
        f.set(FormField::Distance, d);
        f.set(FormField::Duration, t);
        f.set(FormField::Cadence, c);
    }

    #[test]
    fn start_loads_map_and_listens() {
        let mut s = session();
        s.start(&mut Fixed(Ok(Coords::new(10.0, 20.0)))).unwrap();
        let map = s.map().unwrap();
        assert_eq!(map.center, Some(Coords::new(10.0, 20.0)));
        assert!(map.listening);
    }

    #[test]
    fn start_failure_alerts_once_and_leaves_map_empty() {
        let mut s = session();
        let err = s.start(&mut Fixed(Err(PositionError::Denied))).unwrap_err();
        assert_eq!(err, SessionError::PositionUnavailable(PositionError::Denied));
        assert!(s.map().is_none());
        assert_eq!(s.notifier().0, vec!["Could not get your position"]);

        s.on_map_click(Coords::new(1.0, 1.0));
        assert!(s.pending_location().is_none());
        assert!(s.form().hidden);
    }

    #[test]
    fn position_events_through_handle() {
        let mut s = session();
        let err = s
            .handle(Event::PositionFailed(PositionError::Unavailable))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::PositionUnavailable(PositionError::Unavailable)
        );
        assert!(s.map().is_none());
        assert_eq!(s.notifier().0.len(), 1);

        s.handle(Event::PositionAcquired(Coords::new(48.85, 2.35)))
            .unwrap();
        let map = s.map().unwrap();
        assert_eq!(map.center, Some(Coords::new(48.85, 2.35)));
        assert!(map.listening);

        s.handle(Event::MapClicked(Coords::new(48.86, 2.34))).unwrap();
        assert_eq!(s.pending_location(), Some(Coords::new(48.86, 2.34)));
    }

    #[test]
    fn click_reveals_form_and_replaces_pending() {
        let mut s = session();
        s.on_position(Coords::new(0.0, 0.0));
        s.on_map_click(Coords::new(1.0, 1.0));
        assert!(!s.form().hidden);
        assert_eq!(s.form().focused, Some(FormField::Distance));
        s.on_map_click(Coords::new(2.0, 2.0));
        assert_eq!(s.pending_location(), Some(Coords::new(2.0, 2.0)));
    }

    #[test]
    fn submit_appends_and_marks_pending_location() {
        let mut s = session();
        s.on_position(Coords::new(0.0, 0.0));
        s.on_map_click(Coords::new(59.0, -10.0));
        fill_running(&mut s, "7.1", "20", "200");

        let w = s.submit().unwrap();
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.coords(), Coords::new(59.0, -10.0));

        assert_eq!(s.workouts(), [w]);
        let markers = &s.map().unwrap().markers;
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].0, Coords::new(59.0, -10.0));
        assert_eq!(markers[0].1, "workout");
        assert_eq!(markers[0].2.class_name, "running-popup");
        assert!(s.form().fields.distance.is_empty());
        assert_eq!(s.pending_location(), Some(Coords::new(59.0, -10.0)));
    }

    #[test]
    fn invalid_submit_changes_nothing() {
        let mut s = session();
        s.on_position(Coords::new(0.0, 0.0));
        s.on_map_click(Coords::new(1.0, 1.0));
        fill_running(&mut s, "-5", "20", "200");

        let err = s.submit().unwrap_err();
        assert!(matches!(err, SessionError::InvalidWorkoutInput(_)));
        assert!(s.workouts().is_empty());
        assert!(s.map().unwrap().markers.is_empty());
        assert_eq!(s.form().fields.distance, "-5");
        assert_eq!(s.notifier().0, vec!["Inputs have to be positive numbers!"]);
    }

    #[test]
    fn submit_without_click_is_rejected() {
        let mut s = session();
        s.on_position(Coords::new(0.0, 0.0));
        fill_running(&mut s, "5", "20", "200");
        let err = s.handle(Event::FormSubmitted).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidWorkoutInput(InputError::NoPendingLocation)
        );
        assert!(s.workouts().is_empty());
    }

    #[test]
    fn description_popup() {
        let mut s = Session::new(
            SessionOptions {
                popup_content: PopupContent::Description,
                ..SessionOptions::default()
            },
            Maps,
            FormState::default(),
            Alerts::default(),
        );
        s.on_position(Coords::new(0.0, 0.0));
        s.on_map_click(Coords::new(1.0, 1.0));
        fill_running(&mut s, "5", "20", "170");
        let description = s.submit().unwrap().description();
        assert_eq!(s.map().unwrap().markers[0].1, description);
    }

    #[test]
    fn type_change_event_toggles_rows() {
        let mut s = session();
        s.handle(Event::FormTypeChanged).unwrap();
        assert!(s.form().cadence_row_hidden);
        assert!(!s.form().elevation_row_hidden);
        s.handle(Event::FormTypeChanged).unwrap();
        assert!(!s.form().cadence_row_hidden);
        assert!(s.form().elevation_row_hidden);
    }
}
