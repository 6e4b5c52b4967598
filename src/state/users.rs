//! Views over the admin user list.

use std::str::FromStr;

use super::projects::compare_names;
use crate::models::{SortOrder, UserDto, matches_search, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSort {
    Name,
    Email,
    Date,
}

impl FromStr for UserSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "date" => Ok(Self::Date),
            _ => Err(format!("Invalid sort field: {s}. Valid values: name, email, date")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    pub regular: usize,
}

pub fn filter_by_search(users: &[UserDto], term: &str) -> Vec<UserDto> {
    users
        .iter()
        .filter(|u| matches_search(term, [Some(u.user_name.as_str()), Some(u.email.as_str())]))
        .cloned()
        .collect()
}

/// Users holding `role`. `None` keeps everyone.
pub fn filter_by_role(users: &[UserDto], role: Option<&str>) -> Vec<UserDto> {
    users
        .iter()
        .filter(|u| role.is_none_or(|role| u.roles.iter().any(|r| r == role)))
        .cloned()
        .collect()
}

pub fn sort_users(users: &[UserDto], by: UserSort, order: SortOrder) -> Vec<UserDto> {
    let mut sorted = users.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match by {
            UserSort::Name => compare_names(&a.user_name, &b.user_name),
            UserSort::Email => compare_names(&a.email, &b.email),
            UserSort::Date => parse_timestamp(&a.registration_date)
                .cmp(&parse_timestamp(&b.registration_date)),
        };
        order.apply(ordering)
    });
    sorted
}

pub fn stats(users: &[UserDto]) -> UserStats {
    let admins = users.iter().filter(|u| u.is_admin()).count();
    UserStats {
        total: users.len(),
        admins,
        regular: users.len() - admins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{ADMIN_ROLE, USER_ROLE};

    fn user(id: &str, name: &str, roles: &[&str], registered: &str) -> UserDto {
        UserDto {
            id: id.into(),
            user_name: name.into(),
            email: format!("{name}@example.com"),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            registration_date: registered.into(),
        }
    }

    fn sample() -> Vec<UserDto> {
        vec![
            user("u2", "Bob", &[USER_ROLE], "2024-02-01"),
            user("u1", "alice", &[ADMIN_ROLE, USER_ROLE], "2024-03-01"),
            user("u3", "carol", &[USER_ROLE], "2024-01-01"),
        ]
    }

    fn ids(users: &[UserDto]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn sorts_case_insensitively_and_by_date() {
        assert_eq!(ids(&sort_users(&sample(), UserSort::Name, SortOrder::Asc)), ["u1", "u2", "u3"]);
        assert_eq!(ids(&sort_users(&sample(), UserSort::Date, SortOrder::Desc)), ["u1", "u2", "u3"]);
        assert_eq!(ids(&sort_users(&sample(), UserSort::Email, SortOrder::Desc)), ["u3", "u2", "u1"]);
    }

    #[test]
    fn filters_and_stats() {
        assert_eq!(ids(&filter_by_search(&sample(), "bo")), ["u2"]);
        assert_eq!(ids(&filter_by_role(&sample(), Some(ADMIN_ROLE))), ["u1"]);
        assert_eq!(filter_by_role(&sample(), None).len(), 3);
        assert_eq!(
            stats(&sample()),
            UserStats {
                total: 3,
                admins: 1,
                regular: 2,
            }
        );
    }
}
