//! Noisy type signals

use evodt_darwinian::Strategy;
use rand::Rng;

use super::Player;

/// Signal an agent receives about an opponent of type `actual`.
///
/// Correct with probability `accuracy`; otherwise one of the two other
/// types, each with probability `(1 − accuracy) / 2`.
pub fn receive_signal<R: Rng + ?Sized>(actual: Player, accuracy: f64, rng: &mut R) -> Player {
    let u: f64 = rng.gen();
    let shift = if u < accuracy {
        0
    } else if u < accuracy + (1.0 - accuracy) / 2.0 {
        1
    } else {
        2
    };
    let k = Player::count();
    Player::ALL[(actual.index() + shift) % k]
}
