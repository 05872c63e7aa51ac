use std::sync::Arc;
use std::time::Duration;

use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{Local, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};

use crate::clock::{format_long_date, ClockReading, HeaderClock};
use crate::dashboard::DashboardView;
use crate::error::AdminError;
use crate::form::{create_booking, BookingSubmitter, Notification, QuickBookingForm};
use crate::ledger::BookingLedger;
use crate::schedule::{layout_grid, Booking, Court, ScheduleGrid, SlotConfig};
use crate::table::{query_bookings, BookingTableQuery};

pub struct AppState {
    pub ledger: BookingLedger,
    pub submitter: Arc<dyn BookingSubmitter>,
    pub slot_config: SlotConfig,
    pub clock: HeaderClock,
    /// Fixed "today" for demos and tests; the local date when unset
    pub pinned_today: Option<NaiveDate>,
}

impl AppState {
    /// Must be called from within a tokio runtime (starts the header clock)
    pub fn new(ledger: BookingLedger, submitter: Arc<dyn BookingSubmitter>, slot_config: SlotConfig) -> Self {
        Self {
            ledger,
            submitter,
            slot_config,
            clock: HeaderClock::start(Duration::from_secs(1)),
            pinned_today: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn grid_for(&self, date: NaiveDate) -> Result<(Vec<Booking>, ScheduleGrid), AdminError> {
        let bookings = self.ledger.bookings_for_date(date)?;
        let slots = self.slot_config.slots();
        let grid = layout_grid(&slots, &bookings, self.slot_config.granularity_minutes);
        Ok((bookings, grid))
    }
}

#[derive(Deserialize)]
pub struct DateQuery {
    date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct PrefillQuery {
    court: Option<String>,
    time: Option<String>,
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    slots: Vec<String>,
    granularity_minutes: u32,
    courts: Vec<Court>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    date: NaiveDate,
    date_label: String,
    grid: ScheduleGrid,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    success: bool,
    booking: Booking,
    notification: Notification,
}

// Slot labels and courts for the grid header and the dialog selects
async fn get_slots(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(SlotsResponse {
        slots: state.slot_config.slots(),
        granularity_minutes: state.slot_config.granularity_minutes,
        courts: Court::ALL.to_vec(),
    }))
}

// Schedule grid endpoint
async fn get_schedule(
    query: web::Query<DateQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AdminError> {
    let date = query.date.unwrap_or_else(|| state.today());
    let (_, grid) = state.grid_for(date)?;
    Ok(HttpResponse::Ok().json(ScheduleResponse {
        date,
        date_label: format_long_date(date),
        grid,
    }))
}

// Bookings table endpoint
async fn get_bookings(
    query: web::Query<BookingTableQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AdminError> {
    let bookings = state.ledger.all()?;
    let page = query_bookings(&bookings, &query)?;
    Ok(HttpResponse::Ok().json(page))
}

// Dialog defaults, pre-filled from a clicked grid cell when court and time are given
async fn get_prefill(
    query: web::Query<PrefillQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AdminError> {
    let date = query.date.unwrap_or_else(|| state.today());
    let form = match (&query.court, &query.time) {
        (Some(court), Some(time)) => QuickBookingForm::prefill(court.parse()?, time, date),
        _ => QuickBookingForm::with_defaults(date),
    };
    Ok(HttpResponse::Ok().json(form))
}

// Quick booking submission
async fn post_booking(
    form: web::Json<QuickBookingForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AdminError> {
    let today = state.today();
    let result = create_booking(
        &form,
        today,
        &state.slot_config,
        &state.ledger,
        state.submitter.as_ref(),
    )
    .await;

    match result {
        Ok(booking) => Ok(HttpResponse::Created().json(CreatedResponse {
            success: true,
            notification: Notification::booking_created(&booking),
            booking,
        })),
        Err(AdminError::Submission(reason)) => Ok(HttpResponse::BadGateway().json(serde_json::json!({
            "success": false,
            "error": reason,
            "notification": Notification::booking_failed(),
        }))),
        Err(e) => Err(e),
    }
}

// Dashboard endpoint
async fn get_dashboard(
    query: web::Query<DateQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AdminError> {
    let date = query.date.unwrap_or_else(|| state.today());
    let (bookings, grid) = state.grid_for(date)?;
    Ok(HttpResponse::Ok().json(DashboardView::build(format_long_date(date), &bookings, &grid)))
}

async fn get_clock(state: web::Data<AppState>) -> Result<HttpResponse> {
    let reading: ClockReading = state.clock.current();
    Ok(HttpResponse::Ok().json(reading))
}

// HTML page handlers
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

async fn bookings_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/bookings.html");
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

/// Page and API routes, without static assets
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/bookings", web::get().to(bookings_page))
        .route("/api/slots", web::get().to(get_slots))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/dashboard", web::get().to(get_dashboard))
        .route("/api/clock", web::get().to(get_clock))
        .route("/api/bookings/prefill", web::get().to(get_prefill))
        .service(
            web::resource("/api/bookings")
                .route(web::get().to(get_bookings))
                .route(web::post().to(post_booking)),
        );
}

pub async fn start_server(
    bind: &str,
    port: u16,
    ledger: BookingLedger,
    submitter: Arc<dyn BookingSubmitter>,
    slot_config: SlotConfig,
) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(ledger, submitter, slot_config));
    info!("Serving {} slots per court ({:02}:00-{:02}:00)",
        slot_config.slot_count(), slot_config.opening_hour, slot_config.closing_hour);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(configure)
    })
    .bind((bind, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SimulatedSubmitter;
    use crate::ledger::BookingSource;
    use crate::mock;
    use actix_web::{http::StatusCode, test};

    fn state() -> web::Data<AppState> {
        let submitter = Arc::new(SimulatedSubmitter::new(Duration::from_millis(5), 0.0));
        let mut state = AppState::new(BookingLedger::new(BookingSource::Mock), submitter, SlotConfig::default());
        state.pinned_today = Some(mock::featured_date());
        web::Data::new(state)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_schedule_endpoint() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/schedule?date=2024-12-24").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["date"], "2024-12-24");
        assert_eq!(body["date_label"], "utorak, 24. decembar 2024.");
        let rows = body["grid"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["court"], "Teren 1");
        let first_booking = rows[0]["cells"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["kind"] == "booking")
            .unwrap();
        assert_eq!(first_booking["player"], "Marko Marković");
        assert_eq!(first_booking["span"], 2);
        assert_eq!(first_booking["tone"], "occupied");
    }

    #[actix_web::test]
    async fn test_bookings_endpoint_filters() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/bookings?status=confirmed&sort=player&order=desc")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let players: Vec<&str> = body["rows"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["player"].as_str())
            .collect();
        assert_eq!(players, vec!["Marko Marković", "Jovan Jovanović"]);
        assert_eq!(body["active_filters"], 1);
    }

    #[actix_web::test]
    async fn test_huge_page_size_is_served() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/bookings?page=2&page_size=18446744073709551615")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn test_bad_filter_is_unprocessable() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/bookings?court=Teren%209").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_prefill_from_grid_click() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/bookings/prefill?court=Teren%202&time=14:00")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["court"], "Teren 2");
        assert_eq!(body["time"], "14:00");
        assert_eq!(body["duration"], "90");
        assert_eq!(body["date"], "2024-12-24");
    }

    #[actix_web::test]
    async fn test_post_booking_then_grid_shows_it() {
        let state = state();
        let app = app!(state);
        let form = QuickBookingForm {
            player_name: "Ana Lukić".to_string(),
            ..QuickBookingForm::prefill(Court::Three, "12:00", mock::featured_date())
        };
        let req = test::TestRequest::post().uri("/api/bookings").set_json(&form).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["notification"]["title"], "Rezervacija uspešno kreirana!");
        assert_eq!(body["notification"]["description"], "Ana Lukić - Teren 3 u 12:00");

        let req = test::TestRequest::get().uri("/api/schedule?date=2024-12-24").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let court_three = &body["grid"]["rows"][2];
        assert_eq!(court_three["court"], "Teren 3");
        assert!(court_three["cells"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["kind"] == "booking" && c["player"] == "Ana Lukić" && c["tone"] == "tentative"));
    }

    #[actix_web::test]
    async fn test_post_overlapping_booking_conflicts() {
        let state = state();
        let app = app!(state);
        let form = QuickBookingForm {
            player_name: "Ana Lukić".to_string(),
            ..QuickBookingForm::prefill(Court::One, "10:00", mock::featured_date())
        };
        let req = test::TestRequest::post().uri("/api/bookings").set_json(&form).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_post_invalid_form_lists_fields() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::post()
            .uri("/api/bookings")
            .set_json(serde_json::json!({ "date": "2024-12-24", "player_name": "A" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["fields"]["court"], "Molimo izaberite teren.");
        assert_eq!(body["fields"]["time"], "Molimo izaberite vreme.");
        assert_eq!(body["fields"]["player_name"], "Ime igrača mora imati bar 2 karaktera.");
    }

    #[actix_web::test]
    async fn test_failed_submission_returns_error_toast() {
        let submitter = Arc::new(SimulatedSubmitter::new(Duration::from_millis(1), 1.0));
        let mut inner = AppState::new(BookingLedger::new(BookingSource::Mock), submitter, SlotConfig::default());
        inner.pinned_today = Some(mock::featured_date());
        let state = web::Data::new(inner);
        let app = app!(state);

        let form = QuickBookingForm {
            player_name: "Ana Lukić".to_string(),
            ..QuickBookingForm::prefill(Court::Three, "12:00", mock::featured_date())
        };
        let req = test::TestRequest::post().uri("/api/bookings").set_json(&form).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["notification"]["title"], "Greška pri kreiranju rezervacije.");
        assert_eq!(state.ledger.all().unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn test_dashboard_and_clock() {
        let state = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/dashboard?date=2024-12-24").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["summary"]["bookings"], 3);
        assert_eq!(body["cards"].as_array().unwrap().len(), 4);
        assert_eq!(body["activity"].as_array().unwrap().len(), 3);
        assert_eq!(body["nav"][1]["url"], "/bookings");

        let req = test::TestRequest::get().uri("/api/clock").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["time"].as_str().is_some_and(|t| t.len() == 5));
    }

    #[actix_web::test]
    async fn test_bookings_page_has_column_menu() {
        let state = state();
        let app = app!(state);
        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/bookings").to_request()).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Kolone"));
        assert!(html.contains("id=\"column-toggles\""));
        for col in ["player", "court", "date", "status", "payment_status"] {
            assert!(html.contains(&format!("data-col=\"{}\"", col)), "{}", col);
        }
    }

    #[actix_web::test]
    async fn test_pages_are_served() {
        let state = state();
        let app = app!(state);
        for uri in ["/", "/bookings"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert!(resp.status().is_success(), "{}", uri);
        }
    }
}
