use super::*;

/// Byte palette heavy in whitespace and class-boundary values so random
/// buffers actually exercise the interesting paths.
const PALETTE: &[u8] = &[
    b' ', b' ', b'\t', b'\r', b'\n', b'a', b'z', b'"', b'\\', b'\'', 0x00,
    0x1F, 0x7F, 0x80, 0xFF, b'#', b'=', b'0',
];

fn random_buffer(rng: &mut oorandom::Rand32, len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| PALETTE[rng.rand_u32() as usize % PALETTE.len()])
        .collect()
}

// ── dispatched vs scalar equivalence ────────────────────────────────

#[test]
fn skip_ws_matches_scalar_on_random_buffers() {
    let mut rng = oorandom::Rand32::new(1);
    for _ in 0..2000 {
        let len = (rng.rand_u32() % 100) as usize;
        let buf = random_buffer(&mut rng, len);
        for from in 0..=len {
            assert_eq!(
                skip_ws(&buf, from),
                scalar::skip_ws(&buf, from),
                "skip_ws diverged on {buf:?} from {from}"
            );
        }
    }
}

#[test]
fn skip_ws_no_nl_matches_scalar_on_random_buffers() {
    let mut rng = oorandom::Rand32::new(2);
    for _ in 0..2000 {
        let len = (rng.rand_u32() % 100) as usize;
        let buf = random_buffer(&mut rng, len);
        for from in 0..=len {
            assert_eq!(
                skip_ws_no_nl(&buf, from),
                scalar::skip_ws_no_nl(&buf, from),
                "skip_ws_no_nl diverged on {buf:?} from {from}"
            );
        }
    }
}

#[test]
fn find_byte_matches_scalar_on_random_buffers() {
    let mut rng = oorandom::Rand32::new(3);
    for _ in 0..2000 {
        let len = (rng.rand_u32() % 100) as usize;
        let buf = random_buffer(&mut rng, len);
        let target = PALETTE[rng.rand_u32() as usize % PALETTE.len()];
        for from in 0..=len {
            assert_eq!(
                find_byte(&buf, from, target),
                scalar::find_byte(&buf, from, target),
                "find_byte diverged on {buf:?} from {from} target {target}"
            );
        }
    }
}

#[test]
fn find_two_matches_naive_on_random_buffers() {
    fn naive(bytes: &[u8], mut i: usize, a: u8, b: u8) -> usize {
        while i < bytes.len() && bytes[i] != a && bytes[i] != b {
            i += 1;
        }
        i
    }
    let mut rng = oorandom::Rand32::new(4);
    for _ in 0..2000 {
        let len = (rng.rand_u32() % 100) as usize;
        let buf = random_buffer(&mut rng, len);
        for from in 0..=len {
            assert_eq!(
                find_two(&buf, from, b'"', b'\\'),
                naive(&buf, from, b'"', b'\\'),
                "find_two diverged on {buf:?} from {from}"
            );
        }
    }
}

#[test]
fn find_forbidden_matches_scalar_on_random_buffers() {
    let mut rng = oorandom::Rand32::new(5);
    for _ in 0..4000 {
        let len = (rng.rand_u32() % 120) as usize;
        let buf = random_buffer(&mut rng, len);
        assert_eq!(
            find_forbidden(&buf),
            scalar::find_forbidden(&buf, 0),
            "find_forbidden diverged on {buf:?}"
        );
    }
}

// ── whitespace skipping ─────────────────────────────────────────────

#[test]
fn skip_ws_basics() {
    assert_eq!(skip_ws(b"", 0), 0);
    assert_eq!(skip_ws(b"a", 0), 0);
    assert_eq!(skip_ws(b"   a", 0), 3);
    assert_eq!(skip_ws(b" \t\r\nx", 0), 4);
    assert_eq!(skip_ws(b"    ", 0), 4);
    assert_eq!(skip_ws(b"ab  cd", 2), 4);
    // starting past interesting bytes
    assert_eq!(skip_ws(b"x   ", 1), 4);
    // from == len
    assert_eq!(skip_ws(b"abc", 3), 3);
}

#[test]
fn skip_ws_no_nl_stops_at_newline() {
    assert_eq!(skip_ws_no_nl(b" \t\nx", 0), 2);
    assert_eq!(skip_ws_no_nl(b"\n", 0), 0);
    assert_eq!(skip_ws_no_nl(b" \t\r", 0), 3);
}

#[test]
fn skip_ws_long_runs_cross_chunk_boundaries() {
    for pad in [0usize, 1, 7, 8, 9, 31, 32, 33, 63, 64, 65, 100] {
        let mut buf = vec![b' '; pad];
        buf.push(b'x');
        buf.extend_from_slice(&[b' '; 40]);
        assert_eq!(skip_ws(&buf, 0), pad, "pad {pad}");
        assert_eq!(skip_ws_no_nl(&buf, 0), pad, "pad {pad}");
    }
    // all-whitespace buffers of awkward lengths
    for len in [0usize, 1, 7, 8, 9, 31, 32, 33, 64, 100] {
        let buf = vec![b'\t'; len];
        assert_eq!(skip_ws(&buf, 0), len, "len {len}");
    }
}

// ── byte search ─────────────────────────────────────────────────────

#[test]
fn find_byte_positions() {
    for at in [0usize, 1, 7, 8, 9, 31, 32, 33, 63, 64] {
        let mut buf = vec![b'a'; 70];
        buf[at] = b'\n';
        assert_eq!(find_byte(&buf, 0, b'\n'), at, "at {at}");
    }
    assert_eq!(find_byte(b"abc", 0, b'z'), 3);
    assert_eq!(find_byte(b"", 0, b'z'), 0);
    // only matches at or after `from` count
    assert_eq!(find_byte(b"x..x", 1, b'x'), 3);
}

#[test]
fn find_two_picks_the_first_of_either() {
    assert_eq!(find_two(b"hello\\world\"", 0, b'"', b'\\'), 5);
    assert_eq!(find_two(b"hello\"world\\", 0, b'"', b'\\'), 5);
    assert_eq!(find_two(b"plain text here, quite long indeed", 0, b'"', b'\\'), 34);
}

// ── pre-validation ──────────────────────────────────────────────────

#[test]
fn find_forbidden_accepts_clean_documents() {
    assert_eq!(find_forbidden(b""), None);
    assert_eq!(find_forbidden(b"a = 1\nb = 2\n"), None);
    assert_eq!(find_forbidden(b"tab\there"), None);
    assert_eq!(find_forbidden(b"crlf\r\nline"), None);
    assert_eq!(find_forbidden("unicode \u{00e9}\u{4e16}".as_bytes()), None);
}

#[test]
fn find_forbidden_rejects_control_bytes() {
    assert_eq!(find_forbidden(b"\x00"), Some(0));
    assert_eq!(find_forbidden(b"ab\x01cd"), Some(2));
    assert_eq!(find_forbidden(b"ab\x1fcd"), Some(2));
    assert_eq!(find_forbidden(b"ab\x7fcd"), Some(2));
    // bare CR: not part of a CRLF pair
    assert_eq!(find_forbidden(b"ab\rcd"), Some(2));
    // CR at end of input has no LF after it
    assert_eq!(find_forbidden(b"abc\r"), Some(3));
    // form feed and escape
    assert_eq!(find_forbidden(b"\x0c"), Some(0));
    assert_eq!(find_forbidden(b"\x1b[0m"), Some(0));
}

#[test]
fn find_forbidden_crlf_across_chunk_boundaries() {
    // CR as the last byte of a SWAR/AVX2 chunk, LF in the next one
    for at in [7usize, 8, 31, 32, 63] {
        let mut buf = vec![b'a'; 70];
        buf[at] = b'\r';
        buf[at + 1] = b'\n';
        assert_eq!(find_forbidden(&buf), None, "crlf at {at}");
        // and without the LF it is forbidden
        let mut bad = vec![b'a'; 70];
        bad[at] = b'\r';
        assert_eq!(find_forbidden(&bad), Some(at), "bare cr at {at}");
    }
}

#[test]
fn find_forbidden_reports_first_hit() {
    assert_eq!(find_forbidden(b"ok\x01ok\x02"), Some(2));
    let mut buf = vec![b'a'; 50];
    buf[40] = 0x00;
    buf[45] = 0x7F;
    assert_eq!(find_forbidden(&buf), Some(40));
}
