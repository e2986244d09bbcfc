//! Small byte-buffer helpers.

/// Concatenate byte buffers into a single contiguous vector.
pub fn join_all(chunks: &[&[u8]]) -> Vec<u8> {
	let mut buffer = Vec::with_capacity(chunks.iter().map(|chunk| chunk.len()).sum());
	for chunk in chunks {
		buffer.extend_from_slice(chunk);
	}
	buffer
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_join_all() {
		assert_eq!(join_all(&[]), Vec::<u8>::new());
		assert_eq!(join_all(&[b"ab".as_slice(), b"".as_slice(), b"cde".as_slice()]), b"abcde");
	}
}
