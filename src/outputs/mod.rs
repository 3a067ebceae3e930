//! Output generation for a digest run.
//!
//! # Submodules
//!
//! - [`digest`]: renders the aggregate into the plain-text email body and
//!   builds the subject line
//!
//! # Output Structure
//!
//! ```text
//! ==================================================
//! 📰 PERSONAL NEWS DIGEST
//! 📅 Monday, February 02, 2026
//! 🕒 Generated at: 07:05
//! ==================================================
//!
//! 【 BBC 】
//! 🔗 https://www.bbc.com/news
//!
//! 1. ...
//!
//! ----------------------------------------
//!
//! ==================================================
//! 📊 Summary: News from 3 sources
//! 💡 Tip: Add more sources with a descriptor and rule in scrapers::sites
//! ==================================================
//! ```

pub mod digest;
