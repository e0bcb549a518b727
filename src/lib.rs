//! Admitly: a multi-tenant admissions platform backend.
//!
//! Accounts register through a dual email/phone OTP flow, get a role profile
//! (student, consultant or college) materialized on finalization, and
//! interact through role-scoped endpoints. Colleges publish courses, events,
//! gallery items, faculty and hostels to a public search surface; students
//! are assigned to regional consultants as their profile fills in.

pub mod cli;
pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
