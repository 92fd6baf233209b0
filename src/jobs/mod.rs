pub mod id_assigner;
