//! Background execution of GitHub requests.
//!
//! The navigator decides *what* to fetch; this module runs each request on
//! its own tokio task and posts the outcome back on the event bus, tagged with
//! the ticket it was issued under.
pub mod worker;
