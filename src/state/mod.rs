/// State management module
///
/// This module handles all application state, including:
/// - The ordered collection of pending images (collection.rs)
/// - The preview resource pool tied to that collection (collection.rs)

pub mod collection;
