use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use heero_core::LocationType;

use super::*;
use crate::projection::MAX_ZOOM;

// ---------------------------------------------------------------------------
// Recording surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Event {
    FlyTo { center: LngLat, zoom: f64, duration: Duration },
    FitBounds,
    OpenPopup(String),
    ClosePopup(u32),
}

#[derive(Debug, Default)]
struct Log {
    events: Vec<Event>,
    live_markers: BTreeSet<u32>,
    live_popups: BTreeSet<u32>,
    next_handle: u32,
}

struct RecordingSurface {
    camera: Camera,
    log: Rc<RefCell<Log>>,
}

impl RecordingSurface {
    fn new() -> (Self, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let surface = Self {
            camera: INITIAL_CAMERA,
            log: Rc::clone(&log),
        };
        (surface, log)
    }

    fn handle(&self) -> u32 {
        let mut log = self.log.borrow_mut();
        log.next_handle += 1;
        log.next_handle
    }
}

impl MapSurface for RecordingSurface {
    type Marker = u32;
    type Popup = u32;

    fn camera(&self) -> Camera {
        self.camera
    }

    fn size(&self) -> (f64, f64) {
        (1024.0, 768.0)
    }

    fn fly_to(&mut self, center: LngLat, zoom: f64, duration: Duration) {
        self.camera = Camera { center, zoom };
        self.log
            .borrow_mut()
            .events
            .push(Event::FlyTo { center, zoom, duration });
    }

    fn fit_bounds(&mut self, bounds: &LngLatBounds, padding_px: f64) {
        let (w, h) = self.size();
        let vp = Viewport::fit(bounds, w, h, padding_px, MAX_ZOOM);
        self.camera = Camera {
            center: vp.center,
            zoom: vp.zoom,
        };
        self.log.borrow_mut().events.push(Event::FitBounds);
    }

    fn add_marker(&mut self, _record: &LocationRecord, _icon: &MarkerIcon) -> u32 {
        let id = self.handle();
        self.log.borrow_mut().live_markers.insert(id);
        id
    }

    fn remove_marker(&mut self, marker: u32) {
        assert!(self.log.borrow_mut().live_markers.remove(&marker), "double remove");
    }

    fn open_popup(&mut self, content: &PopupContent) -> u32 {
        let id = self.handle();
        let mut log = self.log.borrow_mut();
        log.live_popups.insert(id);
        log.events.push(Event::OpenPopup(content.record_id.clone()));
        id
    }

    fn close_popup(&mut self, popup: u32) {
        let mut log = self.log.borrow_mut();
        assert!(log.live_popups.remove(&popup), "double close");
        log.events.push(Event::ClosePopup(popup));
    }
}

fn record(id: &str, location_type: LocationType, lng: f64, lat: f64) -> LocationRecord {
    LocationRecord {
        id: id.to_owned(),
        category: location_type.to_string(),
        location_type,
        company_name: Some(format!("Company {id}")),
        address: None,
        city: None,
        phone_number: None,
        url1: None,
        lat,
        lng,
        rating: None,
        review_count: None,
        subcategories: vec![],
        search_query: None,
    }
}

fn sample() -> Vec<LocationRecord> {
    vec![
        record("exc", LocationType::ServiceExcellence, 8.5417, 47.3769),
        record("bosch", LocationType::Bosch, 7.5886, 47.5596),
        record("merc", LocationType::Mercedes, 6.1432, 46.2044),
    ]
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

#[test]
fn rerender_releases_previous_markers() {
    let (surface, log) = RecordingSurface::new();
    let mut view = MapView::new(surface, ViewOptions::default());
    let records = sample();
    let refs: Vec<&LocationRecord> = records.iter().collect();
    let colors = CategoryColorMap::new();

    assert_eq!(view.render(&refs, &colors), 3);
    assert_eq!(view.render(&refs, &colors), 3);
    assert_eq!(view.render(&refs[..1], &colors), 1);
    assert_eq!(log.borrow().live_markers.len(), 1);
    assert_eq!(view.marker_count(), 1);
}

#[test]
fn drop_releases_markers_and_popup() {
    let (surface, log) = RecordingSurface::new();
    let records = sample();
    {
        let mut view = MapView::new(surface, ViewOptions::default());
        let refs: Vec<&LocationRecord> = records.iter().collect();
        view.render(&refs, &CategoryColorMap::new());
        view.select(Some(&records[0]));
        assert!(view.has_popup());
    }
    let log = log.borrow();
    assert!(log.live_markers.is_empty());
    assert!(log.live_popups.is_empty());
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn select_flies_then_swaps_popup() {
    let (surface, log) = RecordingSurface::new();
    let mut view = MapView::new(surface, ViewOptions::default());
    let records = sample();

    view.select(Some(&records[0]));
    view.select(Some(&records[1]));

    let events = log.borrow().events.clone();
    assert_eq!(
        events[0],
        Event::FlyTo {
            center: records[0].lng_lat(),
            zoom: 12.0,
            duration: Duration::from_millis(1000),
        }
    );
    assert_eq!(events[1], Event::OpenPopup("exc".to_owned()));
    assert!(matches!(events[2], Event::FlyTo { .. }));
    assert!(matches!(events[3], Event::ClosePopup(_)));
    assert_eq!(events[4], Event::OpenPopup("bosch".to_owned()));
    assert_eq!(log.borrow().live_popups.len(), 1);
}

#[test]
fn clearing_selection_keeps_camera_and_popup() {
    let (surface, log) = RecordingSurface::new();
    let mut view = MapView::new(surface, ViewOptions::default());
    let records = sample();

    view.select(Some(&records[2]));
    let camera = view.surface().camera();
    let events_before = log.borrow().events.len();

    view.select(None);
    assert_eq!(view.surface().camera(), camera);
    assert_eq!(log.borrow().events.len(), events_before);
    assert!(view.has_popup());
}

#[test]
fn select_zoom_and_duration_come_from_options() {
    let (surface, log) = RecordingSurface::new();
    let options = ViewOptions {
        select_zoom: 14.0,
        fly_duration: Duration::from_millis(250),
        ..ViewOptions::default()
    };
    let mut view = MapView::new(surface, options);
    let records = sample();
    view.select(Some(&records[1]));
    assert!(matches!(
        log.borrow().events[0],
        Event::FlyTo { zoom, duration, .. } if (zoom - 14.0).abs() < f64::EPSILON && duration == Duration::from_millis(250)
    ));
}

// ---------------------------------------------------------------------------
// Initial fit
// ---------------------------------------------------------------------------

#[test]
fn fits_only_while_at_initial_view() {
    let (surface, log) = RecordingSurface::new();
    let mut view = MapView::new(surface, ViewOptions::default());
    let records = sample();
    let refs: Vec<&LocationRecord> = records.iter().collect();

    assert!(view.fit_initial_view(&refs));
    assert_eq!(log.borrow().events, [Event::FitBounds]);

    // The camera moved, so later visible-set changes leave it alone.
    assert!(!view.fit_initial_view(&refs[..1]));
    assert_eq!(log.borrow().events.len(), 1);
}

#[test]
fn no_fit_for_empty_visible_set() {
    let (surface, log) = RecordingSurface::new();
    let mut view = MapView::new(surface, ViewOptions::default());
    assert!(!view.fit_initial_view(&[]));
    assert!(log.borrow().events.is_empty());
}
