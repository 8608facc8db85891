//! Condition evaluation: turns a course's requisite tree into graph edges.
//!
//! Every course referenced anywhere in the tree becomes an edge, regardless of
//! AND/OR structure. The operators only matter for
//! [`gating_requirement_count`], which is explanatory.

use crate::models::{ConditionGroup, CourseId, CourseRecord, LogicalOperator, RequisiteKind};

/// Requisite edges derived from one course record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequisiteEdges {
    /// Courses that must be taken in an earlier term.
    pub prerequisites: Vec<CourseId>,
    /// Courses that must be taken in the same term.
    pub corequisites: Vec<CourseId>,
}

impl RequisiteEdges {
    /// All referenced course ids, prerequisites first.
    pub fn referenced(&self) -> impl Iterator<Item = &CourseId> {
        self.prerequisites.iter().chain(self.corequisites.iter())
    }
}

/// Collect the prerequisite and corequisite course ids of a record.
///
/// Ids are deduplicated, keep first-seen order, and a course never lists
/// itself. A course named both as prerequisite and corequisite is kept only as
/// a prerequisite.
pub fn resolve_requisites(record: &CourseRecord) -> RequisiteEdges {
    let mut edges = RequisiteEdges::default();

    for group in &record.condition_groups {
        for condition in &group.conditions {
            let target = match condition.kind {
                RequisiteKind::Prerequisite => &mut edges.prerequisites,
                RequisiteKind::Corequisite => &mut edges.corequisites,
            };
            for course in &condition.courses {
                if *course != record.id && !target.contains(course) {
                    target.push(course.clone());
                }
            }
        }
    }

    let prerequisites = &edges.prerequisites;
    edges.corequisites.retain(|c| !prerequisites.contains(c));
    edges
}

/// Number of courses that must be completed or paired before `record` can be taken.
///
/// Within a group, AND sums its conditions and OR takes the cheapest one.
/// Groups are joined with AND. A condition listing several courses needs all
/// of them.
pub fn gating_requirement_count(record: &CourseRecord) -> usize {
    record.condition_groups.iter().map(group_cost).sum()
}

fn group_cost(group: &ConditionGroup) -> usize {
    let costs = group.conditions.iter().map(|c| c.courses.len());
    match group.operator {
        LogicalOperator::And => costs.sum(),
        LogicalOperator::Or => costs.min().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    fn condition(kind: RequisiteKind, courses: &[&str]) -> Condition {
        Condition {
            kind,
            minimum_grade: None,
            courses: courses.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn record_with(groups: Vec<ConditionGroup>) -> CourseRecord {
        let mut record = CourseRecord::new("C", "Course", 3.0);
        record.condition_groups = groups;
        record
    }

    #[test]
    fn test_or_branches_all_become_edges() {
        let record = record_with(vec![ConditionGroup {
            operator: LogicalOperator::Or,
            conditions: vec![
                condition(RequisiteKind::Prerequisite, &["A"]),
                condition(RequisiteKind::Prerequisite, &["B"]),
            ],
        }]);
        let edges = resolve_requisites(&record);
        assert_eq!(edges.prerequisites, vec!["A".to_string(), "B".to_string()]);
        assert!(edges.corequisites.is_empty());
    }

    #[test]
    fn test_corequisites_split_out() {
        let record = record_with(vec![ConditionGroup {
            operator: LogicalOperator::And,
            conditions: vec![
                condition(RequisiteKind::Prerequisite, &["A"]),
                condition(RequisiteKind::Corequisite, &["LAB"]),
            ],
        }]);
        let edges = resolve_requisites(&record);
        assert_eq!(edges.prerequisites, vec!["A".to_string()]);
        assert_eq!(edges.corequisites, vec!["LAB".to_string()]);
    }

    #[test]
    fn test_prerequisite_wins_over_corequisite() {
        let record = record_with(vec![ConditionGroup {
            operator: LogicalOperator::Or,
            conditions: vec![
                condition(RequisiteKind::Prerequisite, &["A"]),
                condition(RequisiteKind::Corequisite, &["A", "A"]),
            ],
        }]);
        let edges = resolve_requisites(&record);
        assert_eq!(edges.prerequisites, vec!["A".to_string()]);
        assert!(edges.corequisites.is_empty());
    }

    #[test]
    fn test_gating_count_or_takes_cheapest_branch() {
        let record = record_with(vec![
            ConditionGroup {
                operator: LogicalOperator::Or,
                conditions: vec![
                    condition(RequisiteKind::Prerequisite, &["A", "B"]),
                    condition(RequisiteKind::Prerequisite, &["C"]),
                ],
            },
            ConditionGroup {
                operator: LogicalOperator::And,
                conditions: vec![
                    condition(RequisiteKind::Prerequisite, &["D"]),
                    condition(RequisiteKind::Corequisite, &["E"]),
                ],
            },
        ]);
        assert_eq!(gating_requirement_count(&record), 3);
    }
}
