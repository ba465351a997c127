pub mod counts_loss_weight;
pub mod modisco;
