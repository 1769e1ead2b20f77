use super::ApiError;
use crate::constants::limits::MAX_PAGE_SIZE;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

pub fn validate_page(page: u64) -> Result<u64, ApiError> {
    if page == 0 {
        return Err(ApiError::validation("Invalid page: pages start at 1"));
    }
    Ok(page)
}

pub fn validate_page_size(page_size: u64) -> Result<u64, ApiError> {
    const MIN_PAGE_SIZE: u64 = 1;

    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::validation(format!(
            "Invalid page_size: {}. Page size must be between {} and {}",
            page_size, MIN_PAGE_SIZE, MAX_PAGE_SIZE
        )));
    }
    Ok(page_size)
}

pub fn validate_email_param(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    Ok(trimmed)
}
