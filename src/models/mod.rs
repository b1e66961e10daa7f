//! Data models for the library loans server

pub mod collection;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use collection::Collection;
pub use loan::{Loan, LoanHistoryEntry, MemberLoan};
pub use member::Member;
