use aesw_core::{AeswError, Block, RoundKeySchedule, ROUND_KEY_BYTES, ROUND_KEY_WORDS};

#[test]
fn test_block_word_order() {
    let bytes: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    ];
    let block = Block::from_bytes(&bytes);

    // Row 0 sits in the low byte of each column word
    assert_eq!(block.0, [0x33221100, 0x77665544, 0xbbaa9988, 0xffeeddcc]);
    assert_eq!(block.to_bytes(), bytes);
}

#[test]
fn test_schedule_lengths() {
    assert_eq!(
        RoundKeySchedule::from_words(&[0u32; 43]).unwrap_err(),
        AeswError::InvalidKeySchedule
    );
    assert_eq!(
        RoundKeySchedule::from_bytes(&[0u8; ROUND_KEY_BYTES + 1]).unwrap_err(),
        AeswError::InvalidKeySchedule
    );

    let words: Vec<u32> = (0..ROUND_KEY_WORDS as u32).collect();
    let sched = RoundKeySchedule::from_words(&words).unwrap();
    assert_eq!(sched.quad(0), [0, 1, 2, 3]);
    assert_eq!(sched.quad(10), [40, 41, 42, 43]);
}

#[test]
fn test_schedule_bytes_match_words() {
    let mut bytes = [0u8; ROUND_KEY_BYTES];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = i as u8;
    }
    let sched = RoundKeySchedule::from_bytes(&bytes).unwrap();
    assert_eq!(sched.words()[0], 0x03020100);
    assert_eq!(sched.words()[43], 0xafaeadac);
}

#[test]
fn test_debug_redacts_keys() {
    let sched = RoundKeySchedule::new([0xdeadbeef; ROUND_KEY_WORDS]);
    let text = format!("{:?}", sched);
    assert!(!text.contains("deadbeef"));
    assert!(!text.contains(&0xdeadbeefu32.to_string()));
}
