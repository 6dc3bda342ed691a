//! Backend endpoints
//!
//! Every call the panel makes is a method on [`PanelClient`](crate::PanelClient).
//! The client also implements the seams the forms consume:
//! [`RecordSource`](crate::check::RecordSource),
//! [`UserStore`](crate::forms::UserStore) and
//! [`AuthApi`](crate::forms::AuthApi).

mod users;
