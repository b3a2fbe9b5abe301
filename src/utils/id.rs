/// Generate a store id: 12 random bytes rendered as 24 lowercase hex chars
pub fn new_object_id() -> String {
    let bytes: [u8; 12] = rand::random();
    hex::encode(bytes)
}
