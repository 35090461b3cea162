use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use actix_files::Files;
use chrono::{Duration, Local, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::Serialize;
use std::sync::Mutex;

use crate::display::format_slot_line;
use crate::error::RosterError;
use crate::form::{validate_registration, RegistrationRequest};
use crate::roster::RosterStore;
use crate::schedule::{allocate, AllocatorConfig, WeekSchedule};
use crate::slot::week_calendar;
use crate::student::Student;

/// A generated schedule together with the week it was generated for.
pub struct GeneratedSchedule {
    pub table: WeekSchedule,
    pub week_start: NaiveDate,
}

/// Shared server state. The roster store is behind a mutex so concurrent
/// requests cannot interleave their read-modify-write cycles on the file.
pub struct AppState {
    pub roster: Mutex<RosterStore>,
    pub schedule: Mutex<Option<GeneratedSchedule>>,
    pub config: AllocatorConfig,
}

#[derive(Serialize)]
pub struct StudentView {
    id: u32,
    name: String,
    availability: Vec<String>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    week_start: String,
    days: Vec<DayView>,
}

#[derive(Serialize)]
pub struct DayView {
    day: u8,
    name: String,
    date: String,
    periods: Vec<PeriodView>,
}

#[derive(Serialize)]
pub struct PeriodView {
    period: u8,
    name: String,
    students: String,
    is_empty: bool,
}

fn student_view(student: &Student) -> StudentView {
    StudentView {
        id: student.id,
        name: student.name.clone(),
        availability: student
            .availability
            .iter()
            .map(|slot| slot.token())
            .collect(),
    }
}

fn schedule_response(generated: &GeneratedSchedule) -> ScheduleResponse {
    let mut days: Vec<DayView> = Vec::new();
    for slot in week_calendar() {
        let needs_new_day = days.last().map(|d| d.day != slot.day).unwrap_or(true);
        if needs_new_day {
            let day_date = generated.week_start + Duration::days(slot.day as i64);
            days.push(DayView {
                day: slot.day,
                name: slot.day_name().to_string(),
                date: day_date.format("%Y-%m-%d").to_string(),
                periods: Vec::new(),
            });
        }
        let assigned = generated.table.assignees(&slot);
        if let Some(day) = days.last_mut() {
            day.periods.push(PeriodView {
                period: slot.period,
                name: slot.period_name().to_string(),
                students: format_slot_line(&generated.table, &slot),
                is_empty: assigned.is_empty(),
            });
        }
    }
    ScheduleResponse {
        week_start: generated.week_start.format("%Y-%m-%d").to_string(),
        days,
    }
}

// Student list endpoint
async fn list_students(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.roster.lock().unwrap();
    match store.load() {
        Ok(students) => {
            let views: Vec<StudentView> = students.iter().map(student_view).collect();
            Ok(HttpResponse::Ok().json(views))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to load roster: {}", e)
        }))),
    }
}

// Student registration endpoint
async fn register_student(
    req: web::Json<RegistrationRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (name, availability) = match validate_registration(&req) {
        Ok(parsed) => parsed,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": message
            })))
        }
    };

    let store = state.roster.lock().unwrap();
    match store.add(&name, availability) {
        Ok(student) => {
            tracing::info!("registered student {} ({})", student.name, student.id);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "student": student_view(&student)
            })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to save student: {}", e)
        }))),
    }
}

// Student edit endpoint
async fn update_student(
    id: web::Path<u32>,
    req: web::Json<RegistrationRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (name, availability) = match validate_registration(&req) {
        Ok(parsed) => parsed,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": message
            })))
        }
    };

    let store = state.roster.lock().unwrap();
    match store.update(*id, &name, availability) {
        Ok(student) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "student": student_view(&student)
        }))),
        Err(RosterError::StudentNotFound(_)) => {
            Ok(HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": format!("Student {} not found", id)
            })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update student: {}", e)
        }))),
    }
}

// Student deletion endpoint
async fn delete_student(id: web::Path<u32>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.roster.lock().unwrap();
    match store.remove(*id) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(RosterError::StudentNotFound(_)) => {
            Ok(HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": format!("Student {} not found", id)
            })))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to delete student: {}", e)
        }))),
    }
}

// Schedule generation endpoint
async fn generate_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let students = {
        let store = state.roster.lock().unwrap();
        match store.load() {
            Ok(students) => students,
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": format!("Failed to load roster: {}", e)
                })))
            }
        }
    };

    if students.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "No students registered yet"
        })));
    }

    let calendar = week_calendar();
    let mut rng = ChaChaRng::from_entropy();
    match allocate(&students, &calendar, &state.config, &mut rng) {
        Ok(table) => {
            let generated = GeneratedSchedule {
                table,
                week_start: Local::now().date_naive(),
            };
            let response = schedule_response(&generated);
            *state.schedule.lock().unwrap() = Some(generated);
            tracing::info!("generated schedule for {} students", students.len());
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to generate schedule: {}", e)
        }))),
    }
}

// Current schedule endpoint
async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedule = state.schedule.lock().unwrap();
    if let Some(ref generated) = *schedule {
        Ok(HttpResponse::Ok().json(schedule_response(generated)))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Schedule not available"
        })))
    }
}

// HTML page handlers
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn manage_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/manage.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn schedule_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/schedule.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub async fn start_server(
    port: u16,
    store: RosterStore,
    config: AllocatorConfig,
) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        roster: Mutex::new(store),
        schedule: Mutex::new(None),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .route("/", web::get().to(index))
            .route("/manage", web::get().to(manage_page))
            .route("/schedule", web::get().to(schedule_page))
            .route("/api/students", web::get().to(list_students))
            .route("/api/students", web::post().to(register_student))
            .service(
                web::resource("/api/students/{id}")
                    .route(web::put().to(update_student))
                    .route(web::delete().to(delete_student)),
            )
            .route("/api/schedule", web::post().to(generate_schedule))
            .route("/api/schedule", web::get().to(get_schedule))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
