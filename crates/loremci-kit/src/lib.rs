//! loremci Kit contains the parts of a loremci run that reach outside the
//! process: making sure a usable text corpus is installed and handing the
//! generated text to the build system's annotation agent. It is used by
//! `loremci-cli`.

pub mod annotate;
pub mod bootstrap;
