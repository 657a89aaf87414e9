pub mod health;
pub mod job;
pub mod operator;
pub mod schedule;
pub mod validation;

use actix_web::web;

/// Mount every API scope
pub fn configure(config: &mut web::ServiceConfig) {
    config
        .configure(health::health_config)
        .configure(job::handlers::job_config)
        .configure(operator::handlers::operator_config)
        .configure(schedule::handlers::schedule_config);
}
