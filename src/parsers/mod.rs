pub mod gettext;
