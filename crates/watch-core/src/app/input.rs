impl<IN> WatchApp<IN>
where
    IN: InputProvider,
{
    /// Polls the buttons; edges inside the post-wake settle window are dropped.
    fn poll_edges(&mut self, now_ms: u32) -> ButtonEdges {
        let edges = match self.input.poll(now_ms) {
            Ok(edges) => edges,
            Err(_) => {
                warn!("app: input poll failed");
                return ButtonEdges::NONE;
            }
        };

        if let Some(started_ms) = self.settle_started_ms {
            if now_ms.wrapping_sub(started_ms) < self.config.wake_settle_ms {
                if edges.any() {
                    debug!("app: edge ignored while settling");
                }
                return ButtonEdges::NONE;
            }
            self.settle_started_ms = None;
        }

        edges
    }
}
