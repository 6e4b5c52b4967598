//! Views over a project's member list.
//!
//! Members have no container of their own; these are pure functions over
//! whatever list the caller fetched.

use std::cmp::Ordering;
use std::str::FromStr;

use super::projects::compare_names;
use crate::models::{ProjectMember, ProjectRole, matches_search, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberSort {
    #[default]
    Role,
    Name,
    Date,
}

impl FromStr for MemberSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "role" => Ok(Self::Role),
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            _ => Err(format!("Invalid sort field: {s}. Valid values: role, name, date")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberStats {
    pub total: usize,
    pub owners: usize,
    pub admins: usize,
    pub members: usize,
}

/// Members whose name or email contains `term`.
pub fn filter_by_search(members: &[ProjectMember], term: &str) -> Vec<ProjectMember> {
    members
        .iter()
        .filter(|m| matches_search(term, [Some(m.user_name.as_str()), m.email.as_deref()]))
        .cloned()
        .collect()
}

/// `None` keeps every role.
pub fn filter_by_role(members: &[ProjectMember], role: Option<ProjectRole>) -> Vec<ProjectMember> {
    members
        .iter()
        .filter(|m| role.is_none_or(|role| m.role == role))
        .cloned()
        .collect()
}

/// The owner always comes first; the rest follow `by`.
///
/// `Role` puts higher roles first, `Name` and `Date` are ascending.
pub fn sort_members(members: &[ProjectMember], by: MemberSort) -> Vec<ProjectMember> {
    let mut sorted = members.to_vec();
    sorted.sort_by(|a, b| {
        let owner_first = (b.role == ProjectRole::Owner).cmp(&(a.role == ProjectRole::Owner));
        owner_first.then_with(|| match by {
            MemberSort::Role => b.role.hierarchy_level().cmp(&a.role.hierarchy_level()),
            MemberSort::Name => compare_names(&a.user_name, &b.user_name),
            MemberSort::Date => compare_joined(a, b),
        })
    });
    sorted
}

fn compare_joined(a: &ProjectMember, b: &ProjectMember) -> Ordering {
    parse_timestamp(&a.joined_date).cmp(&parse_timestamp(&b.joined_date))
}

pub fn owner(members: &[ProjectMember]) -> Option<&ProjectMember> {
    members.iter().find(|m| m.role == ProjectRole::Owner)
}

/// The role `user_id` holds in this member list, if any.
pub fn role_of(members: &[ProjectMember], user_id: &str) -> Option<ProjectRole> {
    members.iter().find(|m| m.user_id == user_id).map(|m| m.role)
}

pub fn stats(members: &[ProjectMember]) -> MemberStats {
    let count = |role: ProjectRole| members.iter().filter(|m| m.role == role).count();
    MemberStats {
        total: members.len(),
        owners: count(ProjectRole::Owner),
        admins: count(ProjectRole::Admin),
        members: count(ProjectRole::Member),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: &str, name: &str, role: ProjectRole, joined: &str) -> ProjectMember {
        ProjectMember {
            project_id: "p1".into(),
            project_name: "Website".into(),
            user_id: user_id.into(),
            user_name: name.into(),
            email: Some(format!("{name}@example.com")),
            role,
            joined_date: joined.into(),
        }
    }

    fn sample() -> Vec<ProjectMember> {
        vec![
            member("u3", "carol", ProjectRole::Member, "2024-03-01"),
            member("u2", "bob", ProjectRole::Admin, "2024-02-01"),
            member("u1", "alice", ProjectRole::Owner, "2024-01-01"),
            member("u4", "dave", ProjectRole::Member, "2024-01-15"),
        ]
    }

    fn names(members: &[ProjectMember]) -> Vec<&str> {
        members.iter().map(|m| m.user_name.as_str()).collect()
    }

    #[test]
    fn owner_sorts_first_for_every_field() {
        assert_eq!(
            names(&sort_members(&sample(), MemberSort::Role)),
            ["alice", "bob", "carol", "dave"]
        );
        assert_eq!(
            names(&sort_members(&sample(), MemberSort::Name)),
            ["alice", "bob", "carol", "dave"]
        );
        assert_eq!(
            names(&sort_members(&sample(), MemberSort::Date)),
            ["alice", "dave", "bob", "carol"]
        );
    }

    #[test]
    fn filters_by_search_and_role() {
        assert_eq!(names(&filter_by_search(&sample(), "EXAMPLE.COM")).len(), 4);
        assert_eq!(names(&filter_by_search(&sample(), "car")), ["carol"]);
        assert_eq!(
            names(&filter_by_role(&sample(), Some(ProjectRole::Member))),
            ["carol", "dave"]
        );
        assert_eq!(filter_by_role(&sample(), None).len(), 4);
    }

    #[test]
    fn owner_role_and_stats() {
        let members = sample();
        assert_eq!(owner(&members).unwrap().user_id, "u1");
        assert_eq!(role_of(&members, "u2"), Some(ProjectRole::Admin));
        assert_eq!(role_of(&members, "u9"), None);
        assert_eq!(
            stats(&members),
            MemberStats {
                total: 4,
                owners: 1,
                admins: 1,
                members: 2,
            }
        );
    }
}
