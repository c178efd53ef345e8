/// Enemy wandering AI.
///
/// An enemy walks in a straight cardinal line until it hits a wall, then
/// picks a new direction uniformly at random from the three directions
/// that are not the one that just failed. Never repeating the failed
/// direction also rules out an immediate re-collision by reversing into
/// the same wall on this step.

use rand::Rng;

use super::entity::Dir;

/// Initial direction at spawn: uniform over all four.
pub fn spawn_direction<R: Rng>(rng: &mut R) -> Dir {
    Dir::ALL[rng.gen_range(0..Dir::ALL.len())]
}

/// Direction after a collision: uniform over the three others.
pub fn redirect<R: Rng>(rng: &mut R, blocked: Dir) -> Dir {
    let mut options = [Dir::Up; 3];
    let mut n = 0;
    for d in Dir::ALL {
        if d != blocked {
            options[n] = d;
            n += 1;
        }
    }
    options[rng.gen_range(0..n)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn redirect_never_repeats_the_blocked_direction() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for blocked in Dir::ALL {
            for _ in 0..200 {
                assert_ne!(redirect(&mut rng, blocked), blocked);
            }
        }
    }

    #[test]
    fn redirect_reaches_all_three_alternatives() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(format!("{:?}", redirect(&mut rng, Dir::Up)));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn spawn_direction_is_a_valid_cardinal() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let d = spawn_direction(&mut rng);
            assert!(Dir::ALL.contains(&d));
        }
    }
}
