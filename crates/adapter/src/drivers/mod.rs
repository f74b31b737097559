pub mod freshdesk;
