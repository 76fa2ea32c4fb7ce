use fake::Fake;
use fake::faker::name::raw::Name;
use fake::locales::EN;
use rand::Rng;

/// Full name of a fictional person, drawn from the caller's RNG.
pub fn person_name<R: Rng>(rng: &mut R) -> String {
    Name(EN).fake_with_rng(rng)
}
