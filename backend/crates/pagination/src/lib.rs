//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept a one-based `page` and a `limit` from the query
//! string. [`PageRequest`] normalises those inputs against configured
//! [`PageLimits`], and [`Paginated`] wraps a page of results together with the
//! [`PageInfo`] envelope clients use to render navigation.
//!
//! # Example
//!
//! ```
//! use pagination::{PageInfo, PageLimits, PageRequest, Paginated};
//!
//! let limits = PageLimits::new(10, 100).expect("valid limits");
//! let request = PageRequest::from_query(Some(2), None, limits);
//! assert_eq!(request.offset(), 10);
//!
//! let page = Paginated::new(vec!["a", "b"], PageInfo::new(request, 12));
//! assert_eq!(page.pagination.total_pages, 2);
//! ```

mod envelope;
mod request;

pub use envelope::{PageInfo, Paginated};
pub use request::{PageLimits, PageRequest, PaginationError};
