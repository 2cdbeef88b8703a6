//! Composite-field AES S-box as a pure XOR/AND gate network.
//!
//! GF(2^8) is rebuilt as GF(2^4) over GF(2^2). Inversion then reduces to
//! GF(2^4) multiplies and GF(2^2) squarings, each realised with AND gates, so
//! there is no table and no data-dependent branch. Every plane is 32 lanes
//! wide; one evaluation substitutes 32 bytes.
//!
//! Change of basis: Trans1 = {0x58, 0x2D, 0x9E, 0x0B, 0xDC, 0x04, 0x03, 0x24},
//! inverse Trans1 = {0x98, 0xF3, 0xF2, 0x48, 0x09, 0x81, 0xA9, 0xFF}.

use crate::PLANES;

const ONES: u32 = 0xffff_ffff;

/// Substitute the 32 bytes held in `r` (plane `b` = bit `b`), in place.
#[inline]
pub fn sbox_planes(r: &mut [u32; PLANES]) {
    // --- Basis change (Trans1) ---
    let y0 = r[0] ^ r[1] ^ r[2] ^ r[3] ^ r[6];
    let y1 = r[0] ^ r[5] ^ r[6];
    let y2 = r[0];
    let y3 = r[0] ^ r[1] ^ r[3] ^ r[4] ^ r[7];
    let y4 = r[0] ^ r[5] ^ r[6] ^ r[7];
    let y5 = r[0] ^ r[1] ^ r[5] ^ r[6];
    let y6 = r[0] ^ r[4] ^ r[5] ^ r[6];
    let y7 = r[0] ^ r[1] ^ r[2] ^ r[5] ^ r[6] ^ r[7];

    // y0..y3 is the low GF(2^4) half, y4..y7 the high half
    let lo_sum = y0 ^ y1 ^ y2 ^ y3;
    let hi_sum = y4 ^ y5 ^ y6 ^ y7;

    // --- 1. Square and scale in GF(2^4)/GF(2^2) ---
    let sq_v0 = y0 ^ y4 ^ y6 ^ y2;
    let sq_v1 = y1 ^ y5 ^ y7 ^ y3;
    let sq_m0 = y1 ^ y5;
    let sq_m1 = y0 ^ y4;

    let cross = hi_sum & lo_sum;
    let t0 = ((y6 ^ y4) & (y0 ^ y2)) ^ cross;
    let t1 = ((y5 ^ y7) & (y1 ^ y3)) ^ cross;
    // scale by the GF(2^2) constant
    let n0 = t1 ^ t0;
    let n1 = t0;

    // --- 2. Multiply in GF(2^4) ---
    let hp = (y7 ^ y6) & (y2 ^ y3);
    let d2 = (y6 & y2) ^ hp ^ n0;
    let d3 = (y7 & y3) ^ hp ^ n1;
    let lp = (y5 ^ y4) & (y1 ^ y0);
    let d0 = (y4 & y0) ^ lp ^ n0;
    let d1 = (y5 & y1) ^ lp ^ n1;

    let a0 = sq_v1 ^ d2;
    let a1 = sq_v0 ^ d3;
    let b0 = sq_m1 ^ d0;
    let b1 = sq_m0 ^ sq_m1 ^ d1;

    // norm term, already squared and scaled in GF(2^2)
    let g1 = a1 ^ b1;
    let g0 = (a0 ^ b0) ^ g1;

    // --- 3. Multiplicative inverse in GF(2^4) ---
    let ab = (a1 ^ a0) & (b1 ^ b0);
    let k0 = (a0 & b0) ^ ab;
    let k1 = (a1 & b1) ^ ab;
    let z0 = g1 ^ k1;
    let z1 = g0 ^ k0;

    let zb = (z1 ^ z0) & (b1 ^ b0);
    let i2 = (z0 & b0) ^ zb;
    let i3 = (z1 & b1) ^ zb;
    let za = (z1 ^ z0) & (a1 ^ a0);
    let i0 = (z0 & a0) ^ za;
    let i1 = (z1 & a1) ^ za;

    // --- 4. Multiply back by the low half ---
    let lc = (i3 ^ i1 ^ i2 ^ i0) & lo_sum;
    let lc0 = ((i2 ^ i0) & (y2 ^ y0)) ^ lc;
    let lc1 = ((i3 ^ i1) & (y3 ^ y1)) ^ lc;
    let ls0 = lc1 ^ lc0;
    let ls1 = lc0;

    let lhp = (i3 ^ i2) & (y3 ^ y2);
    let l2 = (i2 & y2) ^ lhp ^ ls0;
    let l3 = (i3 & y3) ^ lhp ^ ls1;
    let llp = (i1 ^ i0) & (y1 ^ y0);
    let l0 = (i0 & y0) ^ llp ^ ls0;
    let l1 = (i1 & y1) ^ llp ^ ls1;

    // --- 5. Multiply back by the high half ---
    let hc = hi_sum & (i0 ^ i1 ^ i2 ^ i3);
    let hc0 = ((y6 ^ y4) & (i2 ^ i0)) ^ hc;
    let hc1 = ((y7 ^ y5) & (i3 ^ i1)) ^ hc;
    let hs0 = hc1 ^ hc0;
    let hs1 = hc0;

    let hhp = (y7 ^ y6) & (i2 ^ i3);
    let h2 = (y6 & i2) ^ hhp ^ hs0;
    let h3 = (y7 & i3) ^ hhp ^ hs1;
    let hlp = (y5 ^ y4) & (i0 ^ i1);
    let h0 = (y4 & i0) ^ hlp ^ hs0;
    let h1 = (y5 & i1) ^ hlp ^ hs1;

    // --- Inverse basis change, then add 0x63 ---
    r[0] = h1 ^ l0 ^ l2 ^ ONES;
    r[1] = h1 ^ l0 ^ l1 ^ ONES;
    r[2] = h0 ^ h2 ^ h3 ^ l1 ^ l2;
    r[3] = h3 ^ l0 ^ l1 ^ l2 ^ l3;
    r[4] = h3 ^ l1 ^ l3;
    r[5] = h0 ^ l2 ^ ONES;
    r[6] = h3 ^ l3 ^ ONES;
    r[7] = h3 ^ l1;
}

/// Named-register form of [`sbox_planes`].
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn sbox(
    r0: &mut u32, r1: &mut u32, r2: &mut u32, r3: &mut u32,
    r4: &mut u32, r5: &mut u32, r6: &mut u32, r7: &mut u32,
) {
    let mut planes = [*r0, *r1, *r2, *r3, *r4, *r5, *r6, *r7];
    sbox_planes(&mut planes);
    *r0 = planes[0];
    *r1 = planes[1];
    *r2 = planes[2];
    *r3 = planes[3];
    *r4 = planes[4];
    *r5 = planes[5];
    *r6 = planes[6];
    *r7 = planes[7];
}
