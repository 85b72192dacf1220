use ecluster_core::{
    CloudHeader, DenseCloud, NeighbourBuffer, OracleError, PointCloud, PointId, ProximityOracle,
};
use ecluster_test_support::scenes::{collinear, lattice_blobs};

#[must_use]
pub fn line(xs: &[f32]) -> DenseCloud {
    DenseCloud::from_rows(collinear(xs)).expect("collinear rows are consistent")
}

#[must_use]
pub fn blobs(count: usize, side: usize) -> DenseCloud {
    DenseCloud::from_rows(lattice_blobs(count, side, 1.0, 10.0))
        .expect("lattice rows are consistent")
        .with_header(CloudHeader::new("lattice").with_seq(1))
}

/// Cloud of integer positions on a ring, answering its own radius queries.
pub struct Ring {
    len: usize,
    header: CloudHeader,
}

impl Ring {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            header: CloudHeader::new("ring"),
        }
    }

    fn hop(&self, left: PointId, right: PointId) -> usize {
        let forward = left.abs_diff(right);
        forward.min(self.len - forward)
    }
}

impl PointCloud for Ring {
    fn len(&self) -> usize {
        self.len
    }

    fn header(&self) -> &CloudHeader {
        &self.header
    }
}

impl ProximityOracle for Ring {
    fn cloud_len(&self) -> usize {
        self.len
    }

    fn radius_search(
        &self,
        query: PointId,
        radius: f32,
        out: &mut NeighbourBuffer,
    ) -> Result<(), OracleError> {
        out.clear();
        if query >= self.len {
            return Err(OracleError::QueryOutOfBounds {
                query,
                len: self.len,
            });
        }
        for id in 0..self.len {
            let distance = f32::from(u16::try_from(self.hop(query, id)).unwrap_or(u16::MAX));
            if distance <= radius {
                out.push(id, distance);
            }
        }
        Ok(())
    }
}
