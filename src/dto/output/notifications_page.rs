use crate::{dto::input::Pagination, repository::Notification};

#[derive(Debug)]
pub struct NotificationsPage {
    pub notifications: Vec<Notification>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl NotificationsPage {
    pub fn new(notifications: Vec<Notification>, pagination: Pagination, total: u64) -> Self {
        let limit = u64::from(pagination.limit.max(1));
        let total_pages = total.div_ceil(limit);
        let page = u64::from(pagination.page);

        Self {
            notifications,
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}
