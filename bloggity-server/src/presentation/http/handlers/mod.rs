use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::data::Pagination;

pub(crate) mod comments;
pub(crate) mod health;
pub(crate) mod posts;
pub(crate) mod token;
pub(crate) mod users;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

impl PaginationQuery {
    pub(crate) fn pagination(&self) -> Pagination {
        Pagination::new(self.limit, self.offset)
    }
}
