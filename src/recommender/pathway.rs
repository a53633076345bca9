//! Four-step NSQF pathway towards a job role.

use crate::models::{JobRole, LearningPace, NsqfCourse, PathwayStep, StepKind};

/// NSQF level professional roles are assumed to require.
pub const TARGET_LEVEL: i64 = 7;

const FOUNDATIONAL_WEEKS: u32 = 12;
const CORE_WEEKS: u32 = 16;
const MICROCREDENTIAL_WEEKS: u32 = 8;
const INTERNSHIP_WEEKS: u32 = 12;

/// Catalog entries strictly above `current_level` and up to `target_level`, ascending by level.
/// Entries on the same level keep catalog order.
pub fn levels_between(courses: &[NsqfCourse], current_level: i64, target_level: i64) -> Vec<&NsqfCourse> {
    if current_level >= target_level {
        return Vec::new();
    }
    let mut levels: Vec<&NsqfCourse> = courses
        .iter()
        .filter(|c| current_level < c.level && c.level <= target_level)
        .collect();
    levels.sort_by_key(|c| c.level);
    levels
}

pub fn build_pathway(role: &JobRole, courses: &[NsqfCourse], current_level: i64, pace: LearningPace) -> Vec<PathwayStep> {
    let levels = levels_between(courses, current_level, TARGET_LEVEL);
    let mut steps = Vec::with_capacity(4);

    if let Some(first) = levels.first() {
        steps.push(PathwayStep {
            step: "Foundational".into(),
            title: first.qualification.clone(),
            description: format!("Build fundamental knowledge with {}", first.qualification),
            duration_weeks: FOUNDATIONAL_WEEKS,
            kind: StepKind::Course,
            level: first.level,
        });
    }
    if levels.len() > 1 {
        if let Some(last) = levels.last() {
            steps.push(PathwayStep {
                step: "Core".into(),
                title: last.qualification.clone(),
                description: format!("Deepen your expertise with {}", last.qualification),
                duration_weeks: CORE_WEEKS,
                kind: StepKind::Course,
                level: last.level,
            });
        }
    }
    if let Some(credential) = role.suggested_microcredentials.first() {
        steps.push(PathwayStep {
            step: "Micro-credential".into(),
            title: credential.clone(),
            description: format!("Specialize with {} certification", credential),
            duration_weeks: MICROCREDENTIAL_WEEKS,
            kind: StepKind::Certification,
            level: TARGET_LEVEL,
        });
    }
    steps.push(PathwayStep {
        step: "On-the-job/Internship".into(),
        title: format!("{} Internship", role.job_title),
        description: format!("Gain practical experience as a {}", role.job_title),
        duration_weeks: INTERNSHIP_WEEKS,
        kind: StepKind::Internship,
        level: TARGET_LEVEL,
    });

    for step in &mut steps {
        step.duration_weeks = scale_weeks(step.duration_weeks, pace);
    }
    steps
}

/// Scale by the pace multiplier, truncating towards zero.
pub fn scale_weeks(weeks: u32, pace: LearningPace) -> u32 {
    (f64::from(weeks) * pace.duration_multiplier()) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn course(id: i64, level: i64, qualification: &str) -> NsqfCourse {
        NsqfCourse {
            id,
            level,
            qualification: qualification.into(),
            example_courses: vec![],
            description: None,
            created_at: Utc::now(),
        }
    }

    fn role(credentials: &[&str]) -> JobRole {
        JobRole {
            id: 1,
            job_title: "Data Analyst".into(),
            skills: vec!["python".into(), "sql".into()],
            demand_score: 90,
            suggested_microcredentials: credentials.iter().map(|c| c.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<NsqfCourse> {
        vec![
            course(1, 7, "Bachelor's Degree"),
            course(2, 4, "Senior Secondary"),
            course(3, 5, "Diploma"),
            course(4, 8, "Master's Degree"),
            course(5, 6, "Advanced Diploma"),
        ]
    }

    #[test]
    fn levels_are_exclusive_below_and_inclusive_at_target() {
        let courses = catalog();
        let levels: Vec<i64> = levels_between(&courses, 4, TARGET_LEVEL).iter().map(|c| c.level).collect();
        assert_eq!(levels, vec![5, 6, 7]);
        assert!(levels_between(&courses, 7, TARGET_LEVEL).is_empty());
    }

    #[test]
    fn full_pathway_has_four_steps() {
        let steps = build_pathway(&role(&["SQL for Data Science"]), &catalog(), 4, LearningPace::Normal);
        let names: Vec<&str> = steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(names, vec!["Foundational", "Core", "Micro-credential", "On-the-job/Internship"]);
        assert_eq!(steps[0].title, "Diploma");
        assert_eq!(steps[1].title, "Bachelor's Degree");
        assert_eq!(steps[1].duration_weeks, 16);
        assert_eq!(steps[3].title, "Data Analyst Internship");
        assert_eq!(steps[3].kind, StepKind::Internship);
    }

    #[test]
    fn single_level_skips_core_and_missing_credentials_skip_certification() {
        let steps = build_pathway(&role(&[]), &catalog(), 6, LearningPace::Normal);
        let names: Vec<&str> = steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(names, vec!["Foundational", "On-the-job/Internship"]);
    }

    #[test]
    fn above_target_only_internship_remains() {
        let steps = build_pathway(&role(&[]), &catalog(), 9, LearningPace::Fast);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].duration_weeks, 8);
    }

    #[test]
    fn pace_scales_and_truncates() {
        assert_eq!(scale_weeks(12, LearningPace::Slow), 15);
        assert_eq!(scale_weeks(16, LearningPace::Fast), 11);
        assert_eq!(scale_weeks(8, LearningPace::Slow), 10);
        assert_eq!(scale_weeks(12, LearningPace::Normal), 12);
    }
}
