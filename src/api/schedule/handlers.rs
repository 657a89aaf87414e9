use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_validator::Json;
use chrono::Local;

use crate::api::job::ServiceError;
use crate::board::Week;
use super::dto::{DropRequest, WeekQuery};
use super::service::ScheduleService;

/// `GET /schedule?week=YYYY-MM-DD`, defaults to the current week
#[get("")]
async fn get_week(
    service: web::Data<ScheduleService>,
    query: web::Query<WeekQuery>,
) -> Result<impl Responder, ServiceError> {
    let day = query.week.unwrap_or_else(|| Local::now().date_naive());
    let grid = service.week_grid(Week::containing(day)?).await?;
    Ok(HttpResponse::Ok().json(grid))
}

#[post("/drop")]
async fn drop_job(
    service: web::Data<ScheduleService>,
    request: Json<DropRequest>,
) -> Result<impl Responder, ServiceError> {
    let response = service.drop_job(&request).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn schedule_config(config: &mut web::ServiceConfig) {
    config.service(web::scope("schedule").service(get_week).service(drop_job));
}
