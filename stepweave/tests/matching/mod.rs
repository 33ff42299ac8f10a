//! Markup matcher tests across dialects

mod dialects;
