use actix_web::{
    HttpResponse, Responder, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use super::models::{JobListQuery, JobPatch, NewJob};
use super::service::{JobService, ServiceError};

/// `GET /jobs?start=YYYY-MM-DD&end=YYYY-MM-DD`
#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<JobListQuery>,
) -> Result<impl Responder, ServiceError> {
    let jobs = service.list_jobs(&query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{id}")]
async fn get_job(service: Data<JobService>, path: Path<i32>) -> Result<impl Responder, ServiceError> {
    let job = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<NewJob>,
) -> Result<impl Responder, ServiceError> {
    let response = service.create_job(&job).await?;
    Ok(HttpResponse::Created().json(response))
}

#[patch("/{id}")]
async fn update_job(
    service: Data<JobService>,
    path: Path<i32>,
    patch: Json<JobPatch>,
) -> Result<impl Responder, ServiceError> {
    let job = service.update_job(path.into_inner(), &patch).await?;
    Ok(HttpResponse::Ok().json(job))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job),
    );
}
