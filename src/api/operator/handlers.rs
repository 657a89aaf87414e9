use actix_web::{HttpResponse, Responder, get, web};
use sqlx::{Pool, Postgres};

use crate::api::job::ServiceError;
use crate::db::operator_repository::OperatorRepository;

/// Active operators in board row order
#[get("")]
async fn list_operators(pool: web::Data<Pool<Postgres>>) -> Result<impl Responder, ServiceError> {
    let operators = OperatorRepository::list_active(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(operators))
}

pub fn operator_config(config: &mut web::ServiceConfig) {
    config.service(web::scope("operators").service(list_operators));
}
