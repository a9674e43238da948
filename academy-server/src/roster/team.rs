//! Team member roster (single global scope)

use futures::future::BoxFuture;
use shared::error::{AppResult, ErrorCode};
use shared::models::{TeamMember, TeamMemberCreate};

use super::global::{GlobalEntry, GlobalRoster};
use crate::ordering::{Collection, OrderResult};
use crate::store::{ContentStore, NewItem};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

/// `MoveTeamMember` and friends
pub type TeamRoster<S> = GlobalRoster<S, TeamMembers>;

pub struct TeamMembers;

impl GlobalEntry for TeamMembers {
    type Item = TeamMember;
    type Create = TeamMemberCreate;

    const COLLECTION: Collection = Collection::TeamMembers;
    const NOT_FOUND: ErrorCode = ErrorCode::TeamMemberNotFound;

    fn validate(data: &TeamMemberCreate) -> AppResult<()> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&data.role, "role", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&data.bio, "bio", MAX_NOTE_LEN)?;
        validate_optional_text(&data.photo_url, "photo_url", MAX_URL_LEN)?;
        Ok(())
    }

    fn new_item(data: TeamMemberCreate) -> NewItem {
        NewItem::TeamMember(data)
    }

    fn list<S: ContentStore>(store: &S) -> BoxFuture<'_, OrderResult<Vec<TeamMember>>> {
        store.list_team_members()
    }

    fn find<S: ContentStore>(store: &S, id: i64) -> BoxFuture<'_, OrderResult<Option<TeamMember>>> {
        store.find_team_member(id)
    }
}
