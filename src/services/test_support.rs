use crate::models::{
    job::{EligibilityCriteria, Job},
    user::{Role, User},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).expect("valid date")
}

pub fn at(year: i32, month: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, d, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn admin() -> User {
    let now = at(2025, 1, 1);
    User {
        id: Uuid::new_v4(),
        name: "Admin User".into(),
        email: format!("admin-{}@example.com", Uuid::new_v4()),
        password_hash: String::new(),
        role: Role::Admin,
        branch: None,
        year: None,
        cgpa: None,
        skills: Vec::new(),
        campus: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn student(name: &str) -> User {
    let now = at(2025, 1, 1);
    User {
        id: Uuid::new_v4(),
        name: name.into(),
        email: format!("student-{}@example.com", Uuid::new_v4()),
        password_hash: String::new(),
        role: Role::Student,
        branch: Some("Computer Science".into()),
        year: Some(4),
        cgpa: Some(Decimal::new(85, 1)),
        skills: vec!["React".into(), "Node.js".into(), "MongoDB".into()],
        campus: Some("BCA Himachal".into()),
        created_at: now,
        updated_at: now,
    }
}

pub fn job(creator: &User, deadline: NaiveDate) -> Job {
    let now = at(2025, 1, 1);
    Job {
        id: Uuid::new_v4(),
        company_name: "Tech Corp".into(),
        title: "Frontend Developer".into(),
        description: "Build product UI".into(),
        eligibility: EligibilityCriteria::default(),
        deadline,
        campuses: vec!["BCA Himachal".into()],
        allowed_students: Vec::new(),
        created_by: creator.id,
        created_at: now,
        updated_at: now,
    }
}
