//! Student project gallery (single global scope)

use futures::future::BoxFuture;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{StudentProject, StudentProjectCreate};

use super::global::{GlobalEntry, GlobalRoster};
use crate::ordering::{Collection, OrderResult};
use crate::store::{ContentStore, NewItem};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

/// `MoveStudentProject` and friends
pub type ProjectGallery<S> = GlobalRoster<S, StudentProjects>;

pub struct StudentProjects;

impl GlobalEntry for StudentProjects {
    type Item = StudentProject;
    type Create = StudentProjectCreate;

    const COLLECTION: Collection = Collection::StudentProjects;
    const NOT_FOUND: ErrorCode = ErrorCode::StudentProjectNotFound;

    fn validate(data: &StudentProjectCreate) -> AppResult<()> {
        validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&data.student_name, "student_name", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.link, "link", MAX_URL_LEN)?;
        if let Some(link) = &data.link
            && !(link.starts_with("https://") || link.starts_with("http://"))
        {
            return Err(
                AppError::validation("link must be an http(s) URL").with_detail("field", "link"),
            );
        }
        Ok(())
    }

    fn new_item(data: StudentProjectCreate) -> NewItem {
        NewItem::StudentProject(data)
    }

    fn list<S: ContentStore>(store: &S) -> BoxFuture<'_, OrderResult<Vec<StudentProject>>> {
        store.list_student_projects()
    }

    fn find<S: ContentStore>(
        store: &S,
        id: i64,
    ) -> BoxFuture<'_, OrderResult<Option<StudentProject>>> {
        store.find_student_project(id)
    }
}
