pub mod pro;
