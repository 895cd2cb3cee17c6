use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::refs::{CohortDefinitionRef, ReportDefinitionRef, UserRef};
use crate::rendering::RenderingMode;

/// Priority with which to run a report request.
///
/// Generally speaking: a user-initiated request expecting an interactive
/// result gets `Highest`; one expecting a file download gets `High`; a
/// request created by a background worker gets `Low` or `Lowest`.
///
/// Declaration order defines the total order — `Highest` sorts first.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

/// A request to run and render a report.
///
/// The uuid is populated when the request is handed to a scheduler:
/// producers construct an unsaved request with no identity, the
/// scheduler assigns the uuid (once) and flips `saved` on acceptance.
///
/// `queue_cmp` places higher-priority requests first, then earlier
/// submission dates, so the type works as a priority-queue payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Write-once; assigned by the scheduler on acceptance.
    #[serde(default)]
    uuid: Option<String>,

    #[serde(default)]
    pub base_cohort: Option<CohortDefinitionRef>,

    pub report_definition: ReportDefinitionRef,

    #[serde(default)]
    pub parameter_values: HashMap<String, serde_json::Value>,

    pub rendering_mode: RenderingMode,

    #[serde(default)]
    pub requested_by: Option<UserRef>,

    /// Submission time; ties on priority break on this, with `None`
    /// sorting as latest.
    #[serde(default)]
    pub request_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub saved: bool,

    /// Insertion-ordered, deduplicated through `add_label`.
    #[serde(default)]
    labels: Vec<String>,

    #[serde(default)]
    pub priority: Priority,
}

impl ReportRequest {
    pub fn new(
        report_definition: ReportDefinitionRef,
        base_cohort: Option<CohortDefinitionRef>,
        parameter_values: HashMap<String, serde_json::Value>,
        rendering_mode: RenderingMode,
        priority: Priority,
    ) -> Self {
        Self {
            report_definition,
            base_cohort,
            parameter_values,
            rendering_mode,
            priority,
            ..Self::default()
        }
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// Assign the identity. Write-once: a second call fails and leaves
    /// the existing uuid untouched.
    pub fn assign_identity(&mut self, uuid: impl Into<String>) -> Result<(), RequestError> {
        if let Some(existing) = &self.uuid {
            return Err(RequestError::IdentityAlreadyAssigned {
                existing: existing.clone(),
            });
        }
        self.uuid = Some(uuid.into());
        Ok(())
    }

    /// Add a label if not already present (case-sensitive exact match).
    /// Idempotent; insertion order is preserved.
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.iter().any(|l| *l == label) {
            self.labels.push(label);
        }
    }

    /// Remove a label. A no-op when the label is absent, including on a
    /// request that never had any label added.
    pub fn remove_label(&mut self, label: &str) {
        self.labels.retain(|l| l != label);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Wholesale replacement. Trusted bulk path: entries are taken as
    /// given, without the dedup `add_label` performs.
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Three-way comparison for queue ordering: priority rank first
    /// (`Highest` sorts first), then `request_date` ascending with a
    /// missing date sorting as latest.
    ///
    /// Kept off `Ord` on purpose: equality on this type is identity
    /// based (see `PartialEq`), so a lawful `Ord` cannot exist here.
    pub fn queue_cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| cmp_date_none_latest(self.request_date, other.request_date))
    }
}

/// Equality follows the assigned identity: two requests are equal iff
/// both carry a uuid and those match. Without a uuid on both sides it
/// falls back to reference identity, so an unaccepted request equals
/// only itself — never another unaccepted request with the same fields.
///
/// `Eq` is deliberately not implemented: reflexivity does not hold
/// across clones of an unaccepted request.
impl PartialEq for ReportRequest {
    fn eq(&self, other: &Self) -> bool {
        match (&self.uuid, &other.uuid) {
            (Some(a), Some(b)) => a == b,
            _ => std::ptr::eq(self, other),
        }
    }
}

/// Ascending date order where `None` sorts after any concrete date.
fn cmp_date_none_latest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_request(priority: Priority, date: Option<DateTime<Utc>>) -> ReportRequest {
        let mut req = ReportRequest::new(
            ReportDefinitionRef {
                uuid: "def-1".to_string(),
                name: Some("weekly census".to_string()),
            },
            None,
            HashMap::new(),
            RenderingMode {
                renderer: "csv".to_string(),
                argument: None,
                sort_weight: None,
            },
            priority,
        );
        req.request_date = date;
        req
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_default_is_normal_and_unsaved() {
        let req = ReportRequest::default();
        assert_eq!(req.priority, Priority::Normal);
        assert!(!req.saved);
        assert!(req.uuid().is_none());
        assert!(req.labels().is_empty());
    }

    #[test]
    fn test_priority_declaration_order() {
        assert!(Priority::Highest < Priority::High);
        assert!(Priority::High < Priority::Normal);
        assert!(Priority::Normal < Priority::Low);
        assert!(Priority::Low < Priority::Lowest);
    }

    #[test]
    fn test_queue_cmp_priority_first() {
        let high = make_request(Priority::Highest, Some(at(200)));
        let low = make_request(Priority::Low, Some(at(100)));

        // Priority wins even against an earlier date.
        assert_eq!(high.queue_cmp(&low), Ordering::Less);
        assert_eq!(low.queue_cmp(&high), Ordering::Greater);
    }

    #[test]
    fn test_queue_cmp_date_breaks_ties() {
        let earlier = make_request(Priority::Normal, Some(at(100)));
        let later = make_request(Priority::Normal, Some(at(200)));

        assert_eq!(earlier.queue_cmp(&later), Ordering::Less);
        assert_eq!(later.queue_cmp(&earlier), Ordering::Greater);
    }

    #[test]
    fn test_queue_cmp_none_date_sorts_latest() {
        let dated = make_request(Priority::Normal, Some(at(100)));
        let undated = make_request(Priority::Normal, None);
        let undated2 = make_request(Priority::Normal, None);

        assert_eq!(dated.queue_cmp(&undated), Ordering::Less);
        assert_eq!(undated.queue_cmp(&dated), Ordering::Greater);
        assert_eq!(undated.queue_cmp(&undated2), Ordering::Equal);
    }

    #[test]
    fn test_queue_cmp_sorts_highest_first_then_earliest() {
        let mut requests = vec![
            make_request(Priority::Low, Some(at(200))),
            make_request(Priority::Highest, Some(at(100))),
            make_request(Priority::Normal, None),
            make_request(Priority::Low, Some(at(100))),
            make_request(Priority::Normal, Some(at(300))),
        ];
        requests.sort_by(|a, b| a.queue_cmp(b));

        let keys: Vec<(Priority, Option<DateTime<Utc>>)> = requests
            .iter()
            .map(|r| (r.priority, r.request_date))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Priority::Highest, Some(at(100))),
                (Priority::Normal, Some(at(300))),
                (Priority::Normal, None),
                (Priority::Low, Some(at(100))),
                (Priority::Low, Some(at(200))),
            ]
        );
    }

    #[test]
    fn test_queue_cmp_transitive() {
        let a = make_request(Priority::High, Some(at(100)));
        let b = make_request(Priority::Normal, Some(at(50)));
        let c = make_request(Priority::Normal, None);

        assert_eq!(a.queue_cmp(&b), Ordering::Less);
        assert_eq!(b.queue_cmp(&c), Ordering::Less);
        assert_eq!(a.queue_cmp(&c), Ordering::Less);
    }

    #[test]
    fn test_unassigned_request_equals_only_itself() {
        let a = make_request(Priority::Normal, Some(at(100)));
        let b = a.clone();

        // Same reference: equal. Identical-field clone: not equal.
        assert!(a == a);
        assert!(a != b);
    }

    #[test]
    fn test_same_identity_is_equal_despite_other_fields() {
        let mut a = make_request(Priority::Highest, Some(at(100)));
        let mut b = make_request(Priority::Lowest, None);
        a.assign_identity("req-1").unwrap();
        b.assign_identity("req-1").unwrap();

        assert!(a == b);
    }

    #[test]
    fn test_differing_or_one_sided_identity_is_not_equal() {
        let mut a = make_request(Priority::Normal, None);
        let mut b = make_request(Priority::Normal, None);
        a.assign_identity("req-1").unwrap();
        b.assign_identity("req-2").unwrap();
        assert!(a != b);

        let unassigned = make_request(Priority::Normal, None);
        assert!(a != unassigned);
        assert!(unassigned != a);
    }

    #[test]
    fn test_assign_identity_is_write_once() {
        let mut req = make_request(Priority::Normal, None);
        req.assign_identity("req-1").unwrap();

        let err = req.assign_identity("req-2").unwrap_err();
        assert_eq!(
            err,
            RequestError::IdentityAlreadyAssigned {
                existing: "req-1".to_string()
            }
        );
        assert_eq!(req.uuid(), Some("req-1"));
    }

    #[test]
    fn test_add_label_is_idempotent_and_ordered() {
        let mut req = make_request(Priority::Normal, None);
        req.add_label("monthly");
        req.add_label("finance");
        req.add_label("monthly");

        assert_eq!(req.labels(), ["monthly", "finance"]);
    }

    #[test]
    fn test_add_label_is_case_sensitive() {
        let mut req = make_request(Priority::Normal, None);
        req.add_label("Monthly");
        req.add_label("monthly");

        assert_eq!(req.labels(), ["Monthly", "monthly"]);
    }

    #[test]
    fn test_remove_label_on_unlabeled_request_is_noop() {
        let mut req = make_request(Priority::Normal, None);
        req.remove_label("missing");
        assert!(req.labels().is_empty());
    }

    #[test]
    fn test_remove_label_removes_only_the_match() {
        let mut req = make_request(Priority::Normal, None);
        req.add_label("a");
        req.add_label("b");
        req.remove_label("a");
        req.remove_label("a");

        assert_eq!(req.labels(), ["b"]);
    }

    #[test]
    fn test_set_labels_is_trusted_bulk_replace() {
        let mut req = make_request(Priority::Normal, None);
        req.add_label("old");
        req.set_labels(vec!["x".to_string(), "x".to_string()]);

        // Bulk replacement is taken as given, duplicates included.
        assert_eq!(req.labels(), ["x", "x"]);
    }

    #[test]
    fn test_new_leaves_identity_and_saved_at_defaults() {
        let req = make_request(Priority::High, None);
        assert!(req.uuid().is_none());
        assert!(!req.saved);
        assert!(req.requested_by.is_none());
        assert_eq!(req.priority, Priority::High);
    }
}
