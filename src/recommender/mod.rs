//! Hybrid content-based recommender: TF-IDF similarity between the learner's skills and each
//! job role's skills, blended with the role's market demand, then mapped onto an NSQF pathway.

mod pathway;
mod tfidf;

pub use pathway::{build_pathway, levels_between, scale_weeks, TARGET_LEVEL};
pub use tfidf::{tokenize, SparseVector, TfidfVectorizer};

use crate::error::AppError;
use crate::models::{JobRecommendation, JobRole, NewProfile, NsqfCourse, ProfileSummary, RecommendationResult};
use std::cmp::Ordering;

/// Number of job roles returned per request.
pub const NEIGHBORS: usize = 3;
const SIMILARITY_WEIGHT: f64 = 0.6;
const DEMAND_WEIGHT: f64 = 0.4;

/// A fitted model over one snapshot of the catalog.
pub struct Recommender {
    roles: Vec<JobRole>,
    courses: Vec<NsqfCourse>,
    vectorizer: TfidfVectorizer,
    role_vectors: Vec<SparseVector>,
}

impl Recommender {
    /// Fit on the job roles' skill lists. Roles keep the given order, which breaks similarity ties.
    pub fn fit(roles: Vec<JobRole>, courses: Vec<NsqfCourse>) -> Result<Self, AppError> {
        if roles.is_empty() {
            return Err(AppError::Internal("No job roles found in the database".into()));
        }
        let documents: Vec<String> = roles.iter().map(|r| r.skills.join(", ").to_lowercase()).collect();
        let vectorizer = TfidfVectorizer::fit(&documents);
        let role_vectors = documents.iter().map(|d| vectorizer.transform(d)).collect();
        tracing::debug!(
            roles = roles.len(),
            vocabulary = vectorizer.vocabulary_len(),
            "recommender fitted"
        );
        Ok(Recommender {
            roles,
            courses,
            vectorizer,
            role_vectors,
        })
    }

    /// Up to `k` role indices with their cosine distance to `skills_text`, nearest first.
    pub fn nearest(&self, skills_text: &str, k: usize) -> Vec<(usize, f64)> {
        let query = self.vectorizer.transform(skills_text);
        let mut scored: Vec<(usize, f64)> = self
            .role_vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, query.cosine_distance(v)))
            .collect();
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        scored.truncate(k.min(self.roles.len()));
        scored
    }

    pub fn recommend(&self, profile: &NewProfile) -> Result<RecommendationResult, AppError> {
        let skills = normalize_skills(&profile.prior_skills);
        if skills.is_empty() {
            return Err(AppError::invalid_field("prior_skills", "No skills provided in the profile"));
        }

        let mut recommendations: Vec<JobRecommendation> = self
            .nearest(&skills.join(", "), NEIGHBORS)
            .into_iter()
            .map(|(index, distance)| {
                let role = &self.roles[index];
                let similarity = 1.0 - distance;
                let combined = similarity * SIMILARITY_WEIGHT + role.demand_score as f64 / 100.0 * DEMAND_WEIGHT;
                JobRecommendation {
                    job_title: role.job_title.clone(),
                    match_score: (combined * 1000.0).round() / 10.0,
                    pathway: build_pathway(role, &self.courses, profile.education_level, profile.learning_pace),
                    explanation: explain(role, similarity),
                }
            })
            .collect();
        // Stable: equal scores keep neighbor order.
        recommendations.sort_by(|a, b| b.match_score.partial_cmp(&a.match_score).unwrap_or(Ordering::Equal));

        Ok(RecommendationResult {
            recommendations,
            profile: ProfileSummary {
                education_level: profile.education_level,
                skills_count: skills.len(),
                learning_pace: profile.learning_pace,
            },
        })
    }
}

/// Lowercase and trim; blank entries are dropped.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn explain(role: &JobRole, similarity: f64) -> String {
    format!(
        "This role matches {}% of your existing skills and has a high demand score of {}/100. \
         The role typically requires skills in: {}.",
        (similarity * 100.0).floor() as i64,
        role.demand_score,
        role.skills.join(", ")
    )
}
