macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Shorthand for return Err(RiffError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(RiffError::new(ErrorKind::Variant))
// - err!(Variant(Value))   -> return Err(RiffError::new(ErrorKind::Variant(Value)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::RiffError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($($value:expr),+ $(,)?)) => {
		return Err(crate::error::RiffError::new(
			crate::error::ErrorKind::$variant($($value),+),
		))
	};
}

// Shorthand for ErrorKind::MalformedChunk { id, reason }
//
// Usage:
//
// - decode_err!(Id, Message)
//
// or bail:
//
// - decode_err!(@BAIL Id, Message)
macro_rules! decode_err {
	($id:literal, $reason:literal) => {
		crate::error::RiffError::new(crate::error::ErrorKind::MalformedChunk {
			id: $id,
			reason: $reason,
		})
	};
	(@BAIL $id:literal, $reason:literal) => {
		return Err(decode_err!($id, $reason))
	};
}

pub(crate) use {decode_err, err, try_vec};
