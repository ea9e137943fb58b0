//! Who may do what to a room, and what the member list looks like afterwards.
//!
//! Every check here works on a loaded [`Room`] and touches nothing else, so
//! handlers stay a plain load, decide, save sequence.

use thiserror::Error;
use uuid::Uuid;

use super::model::{Member, NewMember, Role, Room};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Please fill in all the fields")]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("`{0}` is not a valid enum value for path `role`")]
    InvalidRole(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;

const MEMBER_NOT_FOUND: &str = "Member not found in room";

/// Members spliced out by [`Room::remove_members`], plus the ids that matched nothing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Removal {
    pub deleted: Vec<Member>,
    pub not_found: Vec<String>,
}

impl Room {
    /// The creator always comes first, as owner, whatever else was requested.
    pub fn create(
        title: String,
        creator: Uuid,
        members: impl IntoIterator<Item = NewMember>,
    ) -> PolicyResult<Room> {
        if title.is_empty() {
            return Err(PolicyError::MissingFields(vec!["title"]));
        }

        let members = std::iter::once(Member::new(creator, Role::Owner))
            .chain(members.into_iter().map(|m| Member::new(m.user, m.role)))
            .collect();

        Ok(Room {
            id: Uuid::now_v7(),
            title,
            members,
            version: 0,
        })
    }

    pub fn membership(&self, user: Uuid) -> Option<&Member> {
        self.members.iter().find(|m| m.user == user)
    }

    pub fn is_owner(&self, user: Uuid) -> bool {
        self.members
            .iter()
            .any(|m| m.user == user && m.role == Role::Owner)
    }

    fn owner_count(&self) -> usize {
        self.members.iter().filter(|m| m.role == Role::Owner).count()
    }

    pub fn rename(&mut self, actor: Uuid, title: String) -> PolicyResult<()> {
        if title.is_empty() {
            return Err(PolicyError::MissingFields(vec!["title"]));
        }

        match self.membership(actor).map(|m| m.role) {
            Some(Role::Owner | Role::Admin) => {
                self.title = title;
                Ok(())
            }
            _ => Err(PolicyError::Forbidden(
                "You do not have permission to update this room",
            )),
        }
    }

    /// Appends as-is; any authenticated user may add members.
    pub fn add_members(&mut self, members: impl IntoIterator<Item = NewMember>) {
        self.members
            .extend(members.into_iter().map(|m| Member::new(m.user, m.role)));
    }

    /// `member_id` is `None` when the path id was not a uuid; it then matches
    /// nothing. The role is only parsed once the actor is known to be an owner.
    pub fn set_member_role(
        &mut self,
        actor: Uuid,
        member_id: Option<Uuid>,
        role: &str,
    ) -> PolicyResult<()> {
        let acting = self
            .membership(actor)
            .ok_or(PolicyError::NotFound(MEMBER_NOT_FOUND))?;

        if acting.role != Role::Owner {
            return Err(PolicyError::Forbidden("Only the owner can change roles"));
        }

        let target = self
            .members
            .iter_mut()
            .find(|m| Some(m.id) == member_id)
            .ok_or(PolicyError::NotFound(MEMBER_NOT_FOUND))?;
        target.role = role.parse()?;

        Ok(())
    }

    /// `target` is a member id or, failing that, a user id. `None` matches nothing.
    pub fn remove_member(&mut self, actor: Uuid, target: Option<Uuid>) -> PolicyResult<Member> {
        let target = target.ok_or(PolicyError::NotFound(MEMBER_NOT_FOUND))?;
        let index = self
            .members
            .iter()
            .position(|m| m.id == target)
            .or_else(|| self.members.iter().position(|m| m.user == target))
            .ok_or(PolicyError::NotFound(MEMBER_NOT_FOUND))?;

        let found = &self.members[index];
        if !self.is_owner(actor) && found.user != actor {
            return Err(PolicyError::Forbidden(
                "You do not have permission to remove this member",
            ));
        }

        if found.role == Role::Owner && self.owner_count() == 1 {
            return Err(PolicyError::Forbidden("Cannot remove the only owner"));
        }

        Ok(self.members.remove(index))
    }

    /// Ids are compared against member ids in their string form, so ids that
    /// are not even well-formed simply land in `not_found`.
    pub fn remove_members(&mut self, actor: Uuid, ids: &[String]) -> PolicyResult<Removal> {
        if !self.is_owner(actor) {
            return Err(PolicyError::Forbidden("Permission denied"));
        }

        let mut removal = Removal::default();
        for id in ids {
            match self.members.iter().position(|m| m.id.to_string() == *id) {
                Some(index) => removal.deleted.push(self.members.remove(index)),
                None => removal.not_found.push(id.clone()),
            }
        }

        Ok(removal)
    }

    pub fn check_delete(&self, actor: Uuid) -> PolicyResult<()> {
        if self.is_owner(actor) {
            Ok(())
        } else {
            Err(PolicyError::Forbidden(
                "You do not have permission to delete this room",
            ))
        }
    }

    /// The copy shares no member identities with the source.
    pub fn duplicate(&self, actor: Uuid, title: Option<String>) -> PolicyResult<Room> {
        if !self.is_owner(actor) {
            return Err(PolicyError::Forbidden(
                "You're not authorized to duplicate this room",
            ));
        }

        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.title.clone());

        Ok(Room {
            id: Uuid::now_v7(),
            title,
            members: self
                .members
                .iter()
                .map(|m| Member::new(m.user, m.role))
                .collect(),
            version: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Uuid {
        Uuid::now_v7()
    }

    fn room_with(owner: Uuid, others: &[(Uuid, Role)]) -> Room {
        Room::create(
            "lounge".to_owned(),
            owner,
            others.iter().map(|&(user, role)| NewMember { user, role }),
        )
        .unwrap()
    }

    #[test]
    fn create_puts_creator_first_as_owner() {
        let (owner, other) = (user(), user());
        let room = room_with(owner, &[(other, Role::Owner)]);

        assert_eq!(room.members.len(), 2);
        assert_eq!(room.members[0].user, owner);
        assert_eq!(room.members[0].role, Role::Owner);
        assert_eq!(room.members[1].user, other);
        assert_eq!(room.version, 0);
    }

    #[test]
    fn create_rejects_empty_title() {
        let err = Room::create(String::new(), user(), []).unwrap_err();
        assert_eq!(err, PolicyError::MissingFields(vec!["title"]));
    }

    #[test]
    fn rename_needs_owner_or_admin() {
        let (owner, admin, visitor) = (user(), user(), user());
        let mut room = room_with(owner, &[(admin, Role::Admin), (visitor, Role::Visitor)]);

        room.rename(admin, "den".to_owned()).unwrap();
        assert_eq!(room.title, "den");

        assert!(matches!(
            room.rename(visitor, "nope".to_owned()),
            Err(PolicyError::Forbidden(_))
        ));
        assert!(matches!(
            room.rename(user(), "nope".to_owned()),
            Err(PolicyError::Forbidden(_))
        ));
        assert_eq!(room.title, "den");
    }

    #[test]
    fn add_members_appends_in_order_with_fresh_ids() {
        let owner = user();
        let mut room = room_with(owner, &[]);
        let (a, b) = (user(), user());

        room.add_members([
            NewMember { user: a, role: Role::Visitor },
            NewMember { user: b, role: Role::Moderator },
        ]);

        let users: Vec<_> = room.members.iter().map(|m| m.user).collect();
        assert_eq!(users, vec![owner, a, b]);
        assert_ne!(room.members[1].id, room.members[2].id);
    }

    #[test]
    fn only_owner_changes_roles() {
        let (owner, admin) = (user(), user());
        let mut room = room_with(owner, &[(admin, Role::Admin)]);
        let admin_member = room.members[1].id;

        assert_eq!(
            room.set_member_role(admin, Some(admin_member), "owner"),
            Err(PolicyError::Forbidden("Only the owner can change roles"))
        );
        assert_eq!(
            room.set_member_role(user(), Some(admin_member), "owner"),
            Err(PolicyError::NotFound(MEMBER_NOT_FOUND))
        );
        assert_eq!(
            room.set_member_role(owner, Some(Uuid::now_v7()), "visitor"),
            Err(PolicyError::NotFound(MEMBER_NOT_FOUND))
        );
        assert_eq!(
            room.set_member_role(owner, None, "visitor"),
            Err(PolicyError::NotFound(MEMBER_NOT_FOUND))
        );

        room.set_member_role(owner, Some(admin_member), "visitor").unwrap();
        assert_eq!(room.members[1].role, Role::Visitor);
    }

    #[test]
    fn role_is_checked_after_permissions() {
        let (owner, admin) = (user(), user());
        let mut room = room_with(owner, &[(admin, Role::Admin)]);
        let admin_member = room.members[1].id;

        assert_eq!(
            room.set_member_role(admin, Some(admin_member), "janitor"),
            Err(PolicyError::Forbidden("Only the owner can change roles"))
        );
        assert_eq!(
            room.set_member_role(owner, Some(admin_member), "janitor"),
            Err(PolicyError::InvalidRole("janitor".to_owned()))
        );
        assert_eq!(room.members[1].role, Role::Admin);
    }

    #[test]
    fn remove_resolves_member_id_then_user_id() {
        let (owner, a, b) = (user(), user(), user());
        let mut room = room_with(owner, &[(a, Role::Visitor), (b, Role::Visitor)]);
        let a_member = room.members[1].id;

        assert_eq!(room.remove_member(owner, Some(a_member)).unwrap().user, a);
        assert_eq!(room.remove_member(owner, Some(b)).unwrap().user, b);
        assert_eq!(room.members.len(), 1);
        assert_eq!(
            room.remove_member(owner, Some(Uuid::now_v7())),
            Err(PolicyError::NotFound(MEMBER_NOT_FOUND))
        );
    }

    #[test]
    fn non_owner_may_only_remove_self() {
        let (owner, a, b) = (user(), user(), user());
        let mut room = room_with(owner, &[(a, Role::Admin), (b, Role::Visitor)]);

        assert!(matches!(
            room.remove_member(a, Some(b)),
            Err(PolicyError::Forbidden(_))
        ));
        room.remove_member(b, Some(b)).unwrap();
        assert!(room.membership(b).is_none());
    }

    #[test]
    fn sole_owner_cannot_leave_but_co_owner_can() {
        let (owner, co_owner) = (user(), user());
        let mut room = room_with(owner, &[]);

        assert_eq!(
            room.remove_member(owner, Some(owner)),
            Err(PolicyError::Forbidden("Cannot remove the only owner"))
        );

        room.add_members([NewMember { user: co_owner, role: Role::Owner }]);
        room.remove_member(owner, Some(owner)).unwrap();
        assert!(room.is_owner(co_owner));
        assert!(!room.is_owner(owner));
    }

    #[test]
    fn malformed_target_matches_nobody() {
        let owner = user();
        let mut room = room_with(owner, &[(Uuid::nil(), Role::Visitor)]);

        assert_eq!(
            room.remove_member(owner, None),
            Err(PolicyError::NotFound(MEMBER_NOT_FOUND))
        );
        assert_eq!(room.members.len(), 2);
    }

    #[test]
    fn bulk_removal_reports_partial_success() {
        let (owner, a) = (user(), user());
        let mut room = room_with(owner, &[(a, Role::Visitor)]);
        let a_member = room.members[1].id.to_string();
        let missing = Uuid::now_v7().to_string();

        let removal = room
            .remove_members(owner, &[a_member, missing.clone(), "garbage".to_owned()])
            .unwrap();

        assert_eq!(removal.deleted.len(), 1);
        assert_eq!(removal.deleted[0].user, a);
        assert_eq!(removal.not_found, vec![missing, "garbage".to_owned()]);
        assert_eq!(room.members.len(), 1);
    }

    #[test]
    fn bulk_removal_accepts_any_owner() {
        let (owner, co_owner, a) = (user(), user(), user());
        let mut room = room_with(owner, &[(co_owner, Role::Owner), (a, Role::Visitor)]);
        let a_member = room.members[2].id.to_string();

        assert_eq!(
            room.remove_members(a, &[a_member.clone()]),
            Err(PolicyError::Forbidden("Permission denied"))
        );
        assert_eq!(room.remove_members(co_owner, &[a_member]).unwrap().deleted.len(), 1);
    }

    #[test]
    fn delete_is_owner_only() {
        let (owner, admin) = (user(), user());
        let room = room_with(owner, &[(admin, Role::Admin)]);

        assert!(room.check_delete(owner).is_ok());
        assert!(room.check_delete(admin).is_err());
        assert!(room.check_delete(user()).is_err());
    }

    #[test]
    fn duplicate_copies_pairs_with_new_identities() {
        let (owner, a) = (user(), user());
        let room = room_with(owner, &[(a, Role::Moderator)]);

        let copy = room.duplicate(owner, None).unwrap();
        assert_ne!(copy.id, room.id);
        assert_eq!(copy.title, room.title);
        for (src, dup) in room.members.iter().zip(&copy.members) {
            assert_eq!((src.user, src.role), (dup.user, dup.role));
            assert_ne!(src.id, dup.id);
        }

        let renamed = room.duplicate(owner, Some("annex".to_owned())).unwrap();
        assert_eq!(renamed.title, "annex");

        assert!(matches!(room.duplicate(a, None), Err(PolicyError::Forbidden(_))));
    }

    #[test]
    fn role_parsing_rejects_unknown_values() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(
            "janitor".parse::<Role>(),
            Err(PolicyError::InvalidRole("janitor".to_owned()))
        );
    }
}
