pub mod form_settings;
