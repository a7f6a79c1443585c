use serde::{Deserialize, Serialize};

/// Body returned by the scoring API (and relayed unchanged by the gateway).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<LeaderboardData>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardData {
    pub results: Option<Vec<RankedResult>>,
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub rank: u32,
    #[serde(rename = "userId")]
    pub user: Student,
    pub total_mark_scored: f64,
    pub accuracy: f64,
    #[serde(default)]
    pub subjects: Vec<SubjectResult>,
    pub marks_gained: Option<f64>,
    pub marks_lost: Option<f64>,
    pub unanswered_marks: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    #[serde(rename = "subjectId")]
    pub subject: SubjectRef,
    pub total_mark_scored: f64,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
}

impl RankedResult {
    /// Score for the subject whose title matches `title`, if the student sat it.
    pub fn subject_score(&self, title: &str) -> Option<f64> {
        self.subjects
            .iter()
            .find(|s| s.subject.title == title)
            .map(|s| s.total_mark_scored)
    }
}

/// Static description of one subject shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub color: &'static str,
    /// Glyph shown before the subject's label.
    pub icon: &'static str,
}

pub type Subjects = Vec<SubjectConfig>;

/// Physics, Chemistry and Mathematics, in display order.
pub fn default_subjects() -> Subjects {
    vec![
        SubjectConfig {
            id: "physics",
            name: "Physics",
            short_name: "Phy",
            color: "#009966",
            icon: "⚛",
        },
        SubjectConfig {
            id: "chemistry",
            name: "Chemistry",
            short_name: "Chem",
            color: "#f54a00",
            icon: "⚗",
        },
        SubjectConfig {
            id: "mathematics",
            name: "Mathematics",
            short_name: "Maths",
            color: "#155dfc",
            icon: "∑",
        },
    ]
}
