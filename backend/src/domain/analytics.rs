//! Aggregation engine: pure statistics over a store snapshot.
//!
//! Every report is recomputed from a [`FeedbackSnapshot`] and an explicit
//! `now`, so results are deterministic and independent of the backing store.
//! Sums and counts stay exact; averages are rounded to two decimal places
//! only when a report is built. Rankings break ties by course name.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Course, CourseId, Feedback, Rating, Role, User};

/// Number of courses in count-ranked lists.
pub const TOP_COURSES_BY_COUNT: usize = 10;
/// Trailing window, in days, of the global daily trend.
pub const RECENT_TREND_DAYS: i64 = 30;
/// Trailing window, in days, of the dashboard's recent counters.
pub const DASHBOARD_RECENT_DAYS: i64 = 7;
/// Minimum submissions before a course can appear among the top rated.
pub const TOP_RATED_MIN_FEEDBACK: u64 = 3;
/// Number of courses in the top-rated list.
pub const TOP_RATED_LIMIT: usize = 5;
/// Analytics window used when the caller gives none.
pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;

/// Round to two decimal places for presentation.
pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Exact running sum and count of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RatingTally {
    sum: u64,
    count: u64,
}

impl RatingTally {
    fn add(&mut self, rating: Rating) {
        self.sum += u64::from(rating.get());
        self.count += 1;
    }

    fn average(self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round_2dp(self.sum as f64 / self.count as f64)
    }

    /// Compare averages without floating point by cross-multiplying.
    fn cmp_average(self, other: Self) -> Ordering {
        let lhs = u128::from(self.sum) * u128::from(other.count);
        let rhs = u128::from(other.sum) * u128::from(self.count);
        lhs.cmp(&rhs)
    }
}

/// Start of a trailing window of `days`, saturating at the earliest
/// representable instant.
fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn tally<'a>(feedback: impl IntoIterator<Item = &'a Feedback>) -> RatingTally {
    feedback.into_iter().fold(RatingTally::default(), |mut acc, item| {
        acc.add(item.rating);
        acc
    })
}

/// Statistics for a single course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub total_feedback: u64,
    pub avg_rating: f64,
    /// Rating → number of submissions; ratings with no submissions are absent.
    pub rating_distribution: BTreeMap<u8, u64>,
}

/// Submission count for one rating value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingCount {
    pub rating: u8,
    pub count: u64,
}

/// A course's position in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRanking {
    pub course_id: CourseId,
    pub course_name: String,
    pub course_code: String,
    pub feedback_count: u64,
    pub avg_rating: f64,
}

/// Number of events on a calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Submissions and their average rating on a calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRating {
    pub date: NaiveDate,
    pub count: u64,
    pub avg_rating: f64,
}

/// Platform-wide feedback statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalFeedbackStats {
    pub total_feedback: u64,
    pub avg_rating: f64,
    pub feedback_by_rating: Vec<RatingCount>,
    pub feedback_by_course: Vec<CourseRanking>,
    pub recent_trends: Vec<DailyCount>,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_students: u64,
    pub total_courses: u64,
    pub total_feedback: u64,
    pub blocked_users: u64,
    pub recent_feedback: u64,
    pub recent_registrations: u64,
    pub avg_rating: f64,
    pub top_courses: Vec<CourseRanking>,
}

/// Windowed trends for the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub user_trends: Vec<DailyCount>,
    pub feedback_trends: Vec<DailyRating>,
    pub course_popularity: Vec<CourseRanking>,
    pub rating_distribution: Vec<RatingCount>,
    /// Window length in days.
    pub period: u32,
}

/// A course with its lifetime feedback numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithStats {
    #[serde(flatten)]
    pub course: Course,
    pub feedback_count: u64,
    pub avg_rating: f64,
}

/// Per-student statistics shown in the admin user detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeedbackStats {
    pub total_feedback: u64,
    pub avg_rating: f64,
    pub joined_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_feedback: Option<DateTime<Utc>>,
}

/// Statistics over the given submissions.
///
/// # Examples
/// ```
/// use course_feedback::domain::analytics::course_stats;
///
/// let stats = course_stats(&[]);
/// assert_eq!(stats.total_feedback, 0);
/// assert_eq!(stats.avg_rating, 0.0);
/// assert!(stats.rating_distribution.is_empty());
/// ```
pub fn course_stats<'a>(feedback: impl IntoIterator<Item = &'a Feedback>) -> CourseStats {
    let mut totals = RatingTally::default();
    let mut distribution = BTreeMap::new();
    for item in feedback {
        totals.add(item.rating);
        *distribution.entry(item.rating.get()).or_insert(0) += 1;
    }
    CourseStats {
        total_feedback: totals.count,
        avg_rating: totals.average(),
        rating_distribution: distribution,
    }
}

/// Statistics over one student's submissions.
pub fn student_feedback_stats(student: &User, feedback: &[Feedback]) -> StudentFeedbackStats {
    let totals = tally(feedback);
    StudentFeedbackStats {
        total_feedback: totals.count,
        avg_rating: totals.average(),
        joined_date: student.created_at,
        last_feedback: feedback.iter().map(|item| item.created_at).max(),
    }
}

fn rating_counts<'a>(feedback: impl IntoIterator<Item = &'a Feedback>) -> Vec<RatingCount> {
    let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
    for item in feedback {
        *counts.entry(item.rating.get()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(rating, count)| RatingCount { rating, count })
        .collect()
}

fn daily_counts(dates: impl IntoIterator<Item = DateTime<Utc>>) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for instant in dates {
        *days.entry(instant.date_naive()).or_insert(0) += 1;
    }
    days.into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

fn daily_ratings<'a>(feedback: impl IntoIterator<Item = &'a Feedback>) -> Vec<DailyRating> {
    let mut days: BTreeMap<NaiveDate, RatingTally> = BTreeMap::new();
    for item in feedback {
        days.entry(item.created_at.date_naive())
            .or_default()
            .add(item.rating);
    }
    days.into_iter()
        .map(|(date, totals)| DailyRating {
            date,
            count: totals.count,
            avg_rating: totals.average(),
        })
        .collect()
}

struct CourseTally<'a> {
    course: &'a Course,
    totals: RatingTally,
}

impl CourseTally<'_> {
    fn ranking(&self) -> CourseRanking {
        CourseRanking {
            course_id: self.course.id,
            course_name: self.course.name.as_ref().to_owned(),
            course_code: self.course.code.as_ref().to_owned(),
            feedback_count: self.totals.count,
            avg_rating: self.totals.average(),
        }
    }

    fn by_count_then_name(a: &Self, b: &Self) -> Ordering {
        b.totals
            .count
            .cmp(&a.totals.count)
            .then_with(|| a.course.name.cmp(&b.course.name))
    }

    fn by_average_then_count_then_name(a: &Self, b: &Self) -> Ordering {
        b.totals
            .cmp_average(a.totals)
            .then_with(|| Self::by_count_then_name(a, b))
    }
}

/// Users, courses and feedback read at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackSnapshot {
    pub users: Vec<User>,
    pub courses: Vec<Course>,
    pub feedback: Vec<Feedback>,
}

impl FeedbackSnapshot {
    /// Build a snapshot from its three collections.
    pub fn new(users: Vec<User>, courses: Vec<Course>, feedback: Vec<Feedback>) -> Self {
        Self {
            users,
            courses,
            feedback,
        }
    }

    fn course_index(&self) -> HashMap<CourseId, &Course> {
        self.courses.iter().map(|course| (course.id, course)).collect()
    }

    /// Tally submissions per resolvable course; unresolvable rows are skipped.
    fn course_tallies<'a>(
        &'a self,
        feedback: impl IntoIterator<Item = &'a Feedback>,
    ) -> Vec<CourseTally<'a>> {
        let index = self.course_index();
        let mut tallies: HashMap<CourseId, CourseTally<'a>> = HashMap::new();
        for item in feedback {
            let Some(course) = index.get(&item.course_id) else {
                continue;
            };
            tallies
                .entry(item.course_id)
                .or_insert_with(|| CourseTally {
                    course,
                    totals: RatingTally::default(),
                })
                .totals
                .add(item.rating);
        }
        tallies.into_values().collect()
    }

    fn top_by_count<'a>(
        &'a self,
        feedback: impl IntoIterator<Item = &'a Feedback>,
        limit: usize,
    ) -> Vec<CourseRanking> {
        let mut tallies = self.course_tallies(feedback);
        tallies.sort_by(CourseTally::by_count_then_name);
        tallies.iter().take(limit).map(CourseTally::ranking).collect()
    }

    fn feedback_since(&self, since: DateTime<Utc>) -> impl Iterator<Item = &Feedback> {
        self.feedback.iter().filter(move |item| item.created_at >= since)
    }

    fn students(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|user| user.role == Role::Student)
    }

    /// Statistics for one course.
    pub fn course_stats(&self, course_id: CourseId) -> CourseStats {
        course_stats(self.feedback.iter().filter(|item| item.course_id == course_id))
    }

    /// Platform-wide totals, rating histogram, busiest courses and the
    /// trailing daily trend.
    pub fn global_feedback_stats(&self, now: DateTime<Utc>) -> GlobalFeedbackStats {
        let totals = tally(&self.feedback);
        let since = window_start(now, RECENT_TREND_DAYS);
        GlobalFeedbackStats {
            total_feedback: totals.count,
            avg_rating: totals.average(),
            feedback_by_rating: rating_counts(&self.feedback),
            feedback_by_course: self.top_by_count(&self.feedback, TOP_COURSES_BY_COUNT),
            recent_trends: daily_counts(self.feedback_since(since).map(|item| item.created_at)),
        }
    }

    /// Headline counters and the best-rated courses.
    ///
    /// Only courses with at least [`TOP_RATED_MIN_FEEDBACK`] submissions are
    /// ranked.
    pub fn dashboard_summary(&self, now: DateTime<Utc>) -> DashboardSummary {
        let since = window_start(now, DASHBOARD_RECENT_DAYS);
        let mut rated: Vec<CourseTally<'_>> = self
            .course_tallies(&self.feedback)
            .into_iter()
            .filter(|entry| entry.totals.count >= TOP_RATED_MIN_FEEDBACK)
            .collect();
        rated.sort_by(CourseTally::by_average_then_count_then_name);

        DashboardSummary {
            total_students: self.students().count() as u64,
            total_courses: self.courses.len() as u64,
            total_feedback: self.feedback.len() as u64,
            blocked_users: self.users.iter().filter(|user| user.is_blocked).count() as u64,
            recent_feedback: self.feedback_since(since).count() as u64,
            recent_registrations: self
                .students()
                .filter(|user| user.created_at >= since)
                .count() as u64,
            avg_rating: tally(&self.feedback).average(),
            top_courses: rated
                .iter()
                .take(TOP_RATED_LIMIT)
                .map(CourseTally::ranking)
                .collect(),
        }
    }

    /// Trends restricted to `created_at >= now - period_days`.
    pub fn analytics(&self, now: DateTime<Utc>, period_days: u32) -> AnalyticsReport {
        let since = window_start(now, i64::from(period_days));
        let window: Vec<&Feedback> = self.feedback_since(since).collect();
        AnalyticsReport {
            user_trends: daily_counts(
                self.students()
                    .filter(|user| user.created_at >= since)
                    .map(|user| user.created_at),
            ),
            feedback_trends: daily_ratings(window.iter().copied()),
            course_popularity: self.top_by_count(window.iter().copied(), TOP_COURSES_BY_COUNT),
            rating_distribution: rating_counts(window.iter().copied()),
            period: period_days,
        }
    }

    /// Every course with its lifetime numbers, busiest first.
    pub fn courses_with_stats(&self) -> Vec<CourseWithStats> {
        let mut per_course: HashMap<CourseId, RatingTally> = HashMap::new();
        for item in &self.feedback {
            per_course.entry(item.course_id).or_default().add(item.rating);
        }
        let mut rows: Vec<(RatingTally, &Course)> = self
            .courses
            .iter()
            .map(|course| (per_course.get(&course.id).copied().unwrap_or_default(), course))
            .collect();
        rows.sort_by(|(a_totals, a), (b_totals, b)| {
            b_totals
                .count
                .cmp(&a_totals.count)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.into_iter()
            .map(|(totals, course)| CourseWithStats {
                course: course.clone(),
                feedback_count: totals.count,
                avg_rating: totals.average(),
            })
            .collect()
    }
}
