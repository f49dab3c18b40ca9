/*!
In-memory tables and their conversion to and from files on disk. Every operation reads whole tables, works on them in
memory, and writes the whole result back out.
*/

pub(crate) mod fields;
pub(crate) mod spatial;
pub(crate) mod attributes;
pub(crate) mod layers;
