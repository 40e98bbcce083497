//! Decides which jobs a student is shown.
//!
//! Display gating uses only three inputs: the deadline (which bucket), the job's
//! allow-list, and whether the student already has an application for the job in
//! any status. Branch, year, CGPA and skill criteria are advisory and surface only
//! through [`evaluate_criteria`].

use crate::models::{application::Application, job::Job, user::User};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Available,
    OverDeadline,
    Hidden,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobBuckets {
    pub available: Vec<Job>,
    pub over_deadline: Vec<Job>,
}

/// Bucket by deadline alone. A deadline of today is still available.
pub fn deadline_bucket(job: &Job, today: NaiveDate) -> Bucket {
    if job.is_open_on(today) {
        Bucket::Available
    } else {
        Bucket::OverDeadline
    }
}

/// An empty allow-list admits everyone.
pub fn passes_allow_list(student_id: Uuid, job: &Job) -> bool {
    !job.has_allow_list() || job.allowed_students.contains(&student_id)
}

/// Where `job` lands for `student_id`, given the ids of jobs they already acted on.
pub fn visibility(
    student_id: Uuid,
    job: &Job,
    acted_on: &HashSet<Uuid>,
    today: NaiveDate,
) -> Bucket {
    let bucket = deadline_bucket(job, today);
    if !passes_allow_list(student_id, job) || acted_on.contains(&job.id) {
        return Bucket::Hidden;
    }
    bucket
}

/// Splits `jobs` into the student's display buckets, keeping input order.
///
/// Applications belonging to other students are ignored.
pub fn classify(
    student: &User,
    jobs: Vec<Job>,
    applications: &[Application],
    today: NaiveDate,
) -> JobBuckets {
    let acted_on: HashSet<Uuid> = applications
        .iter()
        .filter(|a| a.student_id == student.id)
        .map(|a| a.job_id)
        .collect();

    let mut buckets = JobBuckets::default();
    for job in jobs {
        match visibility(student.id, &job, &acted_on, today) {
            Bucket::Available => buckets.available.push(job),
            Bucket::OverDeadline => buckets.over_deadline.push(job),
            Bucket::Hidden => {}
        }
    }
    buckets
}

/// Per-criterion outcome for one student against one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriteriaReport {
    pub job_id: Uuid,
    pub student_id: Uuid,
    pub campus_match: bool,
    pub allow_list_match: bool,
    pub branch_match: bool,
    pub year_match: bool,
    pub cgpa_match: bool,
    pub skills_match: bool,
    pub active: bool,
    pub overall: bool,
}

/// Evaluates the advisory criteria. Missing student fields satisfy the matching criterion.
pub fn evaluate_criteria(student: &User, job: &Job, today: NaiveDate) -> CriteriaReport {
    let criteria = &job.eligibility;

    let campus_match = job.campuses.is_empty()
        || student
            .campus
            .as_ref()
            .map_or(true, |campus| job.campuses.iter().any(|c| c == campus));

    let branch_match = criteria.branches.is_empty()
        || student
            .branch
            .as_ref()
            .map_or(true, |branch| criteria.branches.iter().any(|b| b == branch));

    let year_match = criteria.years.is_empty()
        || student
            .year
            .map_or(true, |year| criteria.years.contains(&year));

    let cgpa_match = criteria.min_cgpa.is_zero()
        || student.cgpa.map_or(true, |cgpa| cgpa >= criteria.min_cgpa);

    let skills_match = criteria.required_skills.is_empty()
        || student.skills.is_empty()
        || criteria
            .required_skills
            .iter()
            .any(|required| student.skills.iter().any(|have| skill_overlaps(have, required)));

    let allow_list_match = passes_allow_list(student.id, job);
    let active = job.is_open_on(today);

    CriteriaReport {
        job_id: job.id,
        student_id: student.id,
        campus_match,
        allow_list_match,
        branch_match,
        year_match,
        cgpa_match,
        skills_match,
        active,
        overall: campus_match
            && allow_list_match
            && branch_match
            && year_match
            && cgpa_match
            && skills_match
            && active,
    }
}

/// "node" matches "Node.js" and vice versa.
fn skill_overlaps(have: &str, required: &str) -> bool {
    let have = have.to_lowercase();
    let required = required.to_lowercase();
    have.contains(&required) || required.contains(&have)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::services::test_support::{admin, at, day, job, student};
    use rust_decimal::Decimal;

    #[test]
    fn deadline_today_is_available_yesterday_is_over() {
        let today = day(2025, 3, 10);
        let s = student("Raj Kumar");
        let open = job(&admin(), day(2025, 3, 10));
        let closed = job(&admin(), day(2025, 3, 9));

        let buckets = classify(&s, vec![open.clone(), closed.clone()], &[], today);
        assert_eq!(buckets.available, vec![open]);
        assert_eq!(buckets.over_deadline, vec![closed]);
    }

    #[test]
    fn allow_list_excluding_student_hides_job_in_both_buckets() {
        let today = day(2025, 3, 10);
        let a = student("Student A");
        let b = student("Student B");

        let mut open = job(&admin(), day(2025, 4, 1));
        open.allowed_students = vec![a.id];
        let mut closed = job(&admin(), day(2025, 1, 1));
        closed.allowed_students = vec![a.id];

        let for_b = classify(&b, vec![open.clone(), closed.clone()], &[], today);
        assert!(for_b.available.is_empty());
        assert!(for_b.over_deadline.is_empty());

        let for_a = classify(&a, vec![open.clone(), closed.clone()], &[], today);
        assert_eq!(for_a.available, vec![open]);
        assert_eq!(for_a.over_deadline, vec![closed]);
    }

    #[test]
    fn any_prior_application_excludes_job() {
        let today = day(2025, 3, 10);
        let s = student("Raj Kumar");
        let applied = job(&admin(), day(2025, 4, 1));
        let rejected = job(&admin(), day(2025, 1, 1));
        let untouched = job(&admin(), day(2025, 4, 2));
        let applications = vec![
            Application::new(s.id, applied.id, ApplicationStatus::Applied, at(2025, 3, 1)),
            Application::new(s.id, rejected.id, ApplicationStatus::Rejected, at(2025, 3, 1)),
        ];

        let buckets = classify(
            &s,
            vec![applied, rejected, untouched.clone()],
            &applications,
            today,
        );
        assert_eq!(buckets.available, vec![untouched]);
        assert!(buckets.over_deadline.is_empty());
    }

    #[test]
    fn other_students_applications_do_not_exclude() {
        let today = day(2025, 3, 10);
        let s = student("Raj Kumar");
        let other = student("Priya Singh");
        let open = job(&admin(), day(2025, 4, 1));
        let applications = vec![Application::new(
            other.id,
            open.id,
            ApplicationStatus::Applied,
            at(2025, 3, 1),
        )];

        let buckets = classify(&s, vec![open.clone()], &applications, today);
        assert_eq!(buckets.available, vec![open]);
    }

    #[test]
    fn criteria_never_gate_display() {
        let today = day(2025, 3, 10);
        let mut s = student("Raj Kumar");
        s.branch = Some("Mechanical".into());
        s.cgpa = Some(Decimal::new(55, 1));

        let mut strict = job(&admin(), day(2025, 4, 1));
        strict.eligibility.branches = vec!["Computer Science".into()];
        strict.eligibility.min_cgpa = Decimal::new(90, 1);
        strict.campuses = vec!["Pune".into()];

        let buckets = classify(&s, vec![strict.clone()], &[], today);
        assert_eq!(buckets.available, vec![strict.clone()]);

        let report = evaluate_criteria(&s, &strict, today);
        assert!(!report.branch_match);
        assert!(!report.cgpa_match);
        assert!(!report.campus_match);
        assert!(!report.overall);
    }

    #[test]
    fn classify_is_repeatable() {
        let today = day(2025, 3, 10);
        let s = student("Raj Kumar");
        let jobs = vec![
            job(&admin(), day(2025, 4, 1)),
            job(&admin(), day(2025, 2, 1)),
            job(&admin(), day(2025, 3, 10)),
        ];

        let first = classify(&s, jobs.clone(), &[], today);
        let second = classify(&s, jobs, &[], today);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_profile_fields_satisfy_criteria() {
        let today = day(2025, 3, 10);
        let mut s = student("New Student");
        s.cgpa = None;
        s.skills.clear();
        s.branch = None;
        s.year = None;
        s.campus = None;

        let mut demanding = job(&admin(), day(2025, 4, 1));
        demanding.eligibility.min_cgpa = Decimal::new(80, 1);
        demanding.eligibility.required_skills = vec!["Rust".into()];
        demanding.eligibility.branches = vec!["Computer Science".into()];
        demanding.eligibility.years = vec![4];

        let report = evaluate_criteria(&s, &demanding, today);
        assert!(report.overall, "{report:?}");
    }

    #[test]
    fn skills_match_is_fuzzy_and_any_of() {
        let today = day(2025, 3, 10);
        let mut s = student("Raj Kumar");
        s.skills = vec!["React".into(), "Node.js".into()];

        let mut posting = job(&admin(), day(2025, 4, 1));
        posting.eligibility.required_skills = vec!["node".into(), "Kubernetes".into()];
        assert!(evaluate_criteria(&s, &posting, today).skills_match);

        posting.eligibility.required_skills = vec!["Kubernetes".into()];
        assert!(!evaluate_criteria(&s, &posting, today).skills_match);
    }

    #[test]
    fn report_flags_closed_and_disallowed_jobs() {
        let today = day(2025, 3, 10);
        let s = student("Raj Kumar");
        let mut posting = job(&admin(), day(2025, 3, 9));
        posting.allowed_students = vec![Uuid::new_v4()];

        let report = evaluate_criteria(&s, &posting, today);
        assert!(!report.active);
        assert!(!report.allow_list_match);
        assert!(!report.overall);
    }
}
