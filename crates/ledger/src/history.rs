use crate::{crypto, CommitReceipt, Hash32};

/// Bounded, hash-chained log of commit receipts
pub struct CommitLog {
    receipts: Vec<CommitReceipt>,
    max: usize,
}

impl CommitLog {
    pub fn new(max: usize) -> Self {
        Self { receipts: Vec::new(), max }
    }

    pub fn record(&mut self, receipt: CommitReceipt) {
        self.receipts.push(receipt);
        if self.receipts.len() > self.max {
            let overflow = self.receipts.len() - self.max;
            self.receipts.drain(0..overflow);
        }
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    pub fn latest(&self) -> Option<&CommitReceipt> {
        self.receipts.last()
    }

    pub fn receipt(&self, tx_id: &Hash32) -> Option<&CommitReceipt> {
        self.receipts.iter().rev().find(|r| &r.tx_id == tx_id)
    }

    /// Recompute every retained tx id and check each links to its predecessor.
    /// The oldest retained receipt may point at a pruned one.
    pub fn verify_chain(&self) -> bool {
        let mut prev: Option<Hash32> = None;

        for r in &self.receipts {
            if let Some(p) = prev {
                if r.prev_tx_id != p {
                    return false;
                }
            }

            match crypto::tx_id(&r.prev_tx_id, r.height, &r.tx_name, &r.write_set) {
                Ok(computed) if computed == r.tx_id => {}
                _ => return false,
            }

            prev = Some(r.tx_id);
        }

        true
    }
}

impl Default for CommitLog {
    fn default() -> Self {
        Self::new(crate::DEFAULT_LOG_CAPACITY)
    }
}
