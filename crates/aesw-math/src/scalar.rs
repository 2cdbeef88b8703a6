/// Rijndael polynomial x^8 + x^4 + x^3 + x + 1, low byte.
const REDUCE: u8 = 0x1B;

/// Raw Rijndael polynomial multiplication, branch-free on both operands.
pub const fn mul_gf8(a: u8, b: u8) -> u8 {
    let mut p = 0u8;
    let mut a = a;
    let mut b = b;
    let mut i = 0;
    while i < 8 {
        let mask = 0u8.wrapping_sub(b & 1);
        p ^= a & mask;
        a = xtime(a);
        b >>= 1;
        i += 1;
    }
    p
}

/// Multiply by x (0x02).
#[inline(always)]
pub const fn xtime(a: u8) -> u8 {
    (a << 1) ^ (0u8.wrapping_sub(a >> 7) & REDUCE)
}

/// Multiplicative inverse as a^254, so inv(0) = 0 as AES defines it.
pub const fn inv_gf8(a: u8) -> u8 {
    // 254 = 0b1111_1110
    let mut result = 1u8;
    let mut base = a;
    let mut e = 254u8;
    while e != 0 {
        if e & 1 == 1 {
            result = mul_gf8(result, base);
        }
        base = mul_gf8(base, base);
        e >>= 1;
    }
    result
}
