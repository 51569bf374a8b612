//! Circular socket buffer address translation.
//!
//! The chip exposes each socket's TX and RX memory as a fixed-size ring.
//! Its 16-bit read/write pointers count bytes forever and wrap through
//! `u16` overflow; only `pointer % size` is a physical offset. A transfer
//! that runs past the top of the ring is split into a tail piece and a
//! piece starting again at the base.

/// One contiguous piece of a ring transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    /// Physical chip address of the first byte
    pub address: u16,
    /// Number of bytes
    pub len: u16,
    /// Offset of this piece inside the caller's buffer
    pub offset: usize,
}

impl Segment {
    /// Caller buffer range covered by this piece
    #[inline(always)]
    pub const fn range(&self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.len as usize
    }
}

/// At most two contiguous pieces making up one ring transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segments {
    first: Segment,
    second: Option<Segment>,
}

impl Segments {
    /// The piece starting at the logical pointer
    #[inline(always)]
    pub const fn first(&self) -> Segment {
        self.first
    }

    /// The piece starting at the ring base, present only on wraparound
    #[inline(always)]
    pub const fn second(&self) -> Option<Segment> {
        self.second
    }

    /// Whether the transfer wraps past the top of the ring
    #[inline(always)]
    pub const fn wraps(&self) -> bool {
        self.second.is_some()
    }

    /// Total bytes across both pieces
    pub fn total_len(&self) -> usize {
        self.iter().map(|s| s.len as usize).sum()
    }

    /// Iterate over the non-empty pieces in transfer order
    pub fn iter(&self) -> impl Iterator<Item = Segment> {
        core::iter::once(self.first)
            .chain(self.second)
            .filter(|s| s.len != 0)
    }
}

/// Geometry of one socket ring buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingBuffer {
    base: u16,
    size: u16,
}

impl RingBuffer {
    /// Create a ring of `size` bytes starting at chip address `base`
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or the ring would extend past `0xFFFF`.
    #[must_use]
    pub const fn new(base: u16, size: u16) -> Self {
        assert!(size != 0, "ring size must be non-zero");
        assert!(
            base as u32 + size as u32 <= 0x1_0000,
            "ring must fit in the 16-bit address space"
        );
        Self { base, size }
    }

    /// First physical address of the ring
    #[inline(always)]
    pub const fn base(&self) -> u16 {
        self.base
    }

    /// Size of the ring in bytes
    #[inline(always)]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Physical address of logical pointer `ptr`
    #[inline(always)]
    pub const fn physical(&self, ptr: u16) -> u16 {
        self.base + ptr % self.size
    }

    /// Split a `len`-byte transfer at logical pointer `ptr` into pieces
    ///
    /// `len` must not exceed the ring size; callers bound it by the free or
    /// received size first.
    pub fn segments(&self, ptr: u16, len: u16) -> Segments {
        debug_assert!(len <= self.size, "transfer larger than ring");

        let offset = ptr % self.size;
        let to_end = self.size - offset;

        if len <= to_end {
            return Segments {
                first: Segment {
                    address: self.base + offset,
                    len,
                    offset: 0,
                },
                second: None,
            };
        }

        Segments {
            first: Segment {
                address: self.base + offset,
                len: to_end,
                offset: 0,
            },
            second: Some(Segment {
                address: self.base,
                len: len - to_end,
                offset: to_end as usize,
            }),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
