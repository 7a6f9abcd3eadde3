use rand::Rng;

// Lowercase letters and digits without 0, o, 1, l, i
const ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyz23456789";
const SEEK_ID_LEN: usize = 6;

pub fn random_seek_id() -> String {
    let mut rng = rand::rng();
    (0..SEEK_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Draw ids until `taken` rejects none of them
pub fn fresh_seek_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = random_seek_id();
        if !taken(&id) {
            return id;
        }
    }
}
