//! Integration tests of the composed client against a scripted transport.

mod helpers;

mod facade;
mod ocs;
mod systemtags;
mod trashbin;
mod webdav;
