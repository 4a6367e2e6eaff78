//! Intrusive doubly-linked list over slice-backed nodes.
//!
//! Nodes live in an external slice (the pool's frame metadata) and carry their
//! own prev/next indices, so ordering changes never allocate. All mutation
//! happens under the pool's single lock, which is why the operations can take
//! the whole node slice by `&mut`.

pub(crate) trait IntrusiveNode {
    fn prev(&self) -> Option<usize>;
    fn set_prev(&mut self, prev: Option<usize>);
    fn next(&self) -> Option<usize>;
    fn set_next(&mut self, next: Option<usize>);
}

#[derive(Debug)]
pub(crate) struct IntrusiveList {
    head: Option<usize>,
    tail: Option<usize>,
}

impl IntrusiveList {
    pub(crate) fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    /// Insert a node that is not currently linked at the head of the list.
    pub(crate) fn push_head<T: IntrusiveNode>(&mut self, index: usize, nodes: &mut [T]) {
        debug_assert!(nodes[index].prev().is_none() && nodes[index].next().is_none());
        match self.head {
            Some(head) => {
                assert_ne!(head, index, "node is already at the head of the list");
                nodes[index].set_next(Some(head));
                nodes[index].set_prev(None);
                nodes[head].set_prev(Some(index));
                self.head = Some(index);
            }
            None => {
                assert!(self.tail.is_none());
                nodes[index].set_prev(None);
                nodes[index].set_next(None);
                self.head = Some(index);
                self.tail = Some(index);
            }
        }
    }

    /// Unlink a node from anywhere in the list.
    pub(crate) fn remove<T: IntrusiveNode>(&mut self, index: usize, nodes: &mut [T]) {
        let prev = nodes[index].prev();
        let next = nodes[index].next();
        match prev {
            Some(prev_idx) => nodes[prev_idx].set_next(next),
            None => {
                assert_eq!(self.head, Some(index), "unlinked node claims to be head");
                self.head = next;
            }
        }
        match next {
            Some(next_idx) => nodes[next_idx].set_prev(prev),
            None => {
                assert_eq!(self.tail, Some(index), "unlinked node claims to be tail");
                self.tail = prev;
            }
        }
        nodes[index].set_prev(None);
        nodes[index].set_next(None);
    }

    /// Move an already-linked node to the head of the list.
    pub(crate) fn move_to_head<T: IntrusiveNode>(&mut self, index: usize, nodes: &mut [T]) {
        if self.head == Some(index) {
            return;
        }
        self.remove(index, nodes);
        self.push_head(index, nodes);
    }

    /// Get the index of the node at the head
    pub(crate) fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Get the index of the node at the tail
    pub(crate) fn peek_tail(&self) -> Option<usize> {
        self.tail
    }
}

#[cfg(test)]
mod intrusive_dll_tests {
    use super::*;

    struct Node {
        prev: Option<usize>,
        next: Option<usize>,
    }

    impl Node {
        fn new() -> Self {
            Self {
                prev: None,
                next: None,
            }
        }
    }

    impl IntrusiveNode for Node {
        fn prev(&self) -> Option<usize> {
            self.prev
        }

        fn set_prev(&mut self, prev: Option<usize>) {
            self.prev = prev
        }

        fn next(&self) -> Option<usize> {
            self.next
        }

        fn set_next(&mut self, next: Option<usize>) {
            self.next = next
        }
    }

    fn build_list(count: usize) -> (IntrusiveList, Vec<Node>) {
        let mut list = IntrusiveList::new();
        let mut nodes: Vec<Node> = (0..count).map(|_| Node::new()).collect();
        for idx in 0..count {
            list.push_head(idx, &mut nodes);
        }
        (list, nodes)
    }

    fn collect_forward(list: &IntrusiveList, nodes: &[Node]) -> Vec<usize> {
        let mut order = Vec::new();
        let mut current = list.peek_head();
        while let Some(idx) = current {
            order.push(idx);
            current = nodes[idx].next();
        }
        order
    }

    fn assert_list_integrity(list: &IntrusiveList, nodes: &[Node]) {
        let forward = collect_forward(list, nodes);
        assert_eq!(forward.last().copied(), list.peek_tail());

        //  walk backwards and check we visit the same nodes in reverse
        let mut backward = Vec::new();
        let mut current = list.peek_tail();
        while let Some(idx) = current {
            backward.push(idx);
            current = nodes[idx].prev();
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_push_head_orders_most_recent_first() {
        let (list, nodes) = build_list(5);
        assert_eq!(collect_forward(&list, &nodes), vec![4, 3, 2, 1, 0]);
        assert_eq!(list.peek_head(), Some(4));
        assert_eq!(list.peek_tail(), Some(0));
        assert_list_integrity(&list, &nodes);
    }

    #[test]
    fn test_move_to_head() {
        let (mut list, mut nodes) = build_list(5);
        list.move_to_head(2, &mut nodes);
        assert_eq!(collect_forward(&list, &nodes), vec![2, 4, 3, 1, 0]);
        assert_list_integrity(&list, &nodes);

        //  moving the head is a no-op
        list.move_to_head(2, &mut nodes);
        assert_eq!(list.peek_head(), Some(2));

        //  moving the tail updates the tail pointer
        list.move_to_head(0, &mut nodes);
        assert_eq!(list.peek_tail(), Some(1));
        assert_list_integrity(&list, &nodes);
    }

    #[test]
    fn test_remove_middle_head_and_tail() {
        let (mut list, mut nodes) = build_list(4);
        list.remove(2, &mut nodes); //  middle
        assert_eq!(collect_forward(&list, &nodes), vec![3, 1, 0]);

        list.remove(3, &mut nodes); //  head
        assert_eq!(list.peek_head(), Some(1));

        list.remove(0, &mut nodes); //  tail
        assert_eq!(list.peek_tail(), Some(1));
        assert_list_integrity(&list, &nodes);
    }

    #[test]
    fn test_single_node_list() {
        let (mut list, mut nodes) = build_list(1);
        list.move_to_head(0, &mut nodes);
        assert_eq!(list.peek_head(), Some(0));
        assert_eq!(list.peek_tail(), Some(0));

        list.remove(0, &mut nodes);
        assert_eq!(list.peek_head(), None);
        assert_eq!(list.peek_tail(), None);
        assert!(nodes[0].prev().is_none() && nodes[0].next().is_none());
    }

    #[test]
    fn test_relink_after_removal() {
        let (mut list, mut nodes) = build_list(3);
        list.remove(1, &mut nodes);
        list.push_head(1, &mut nodes);
        assert_eq!(collect_forward(&list, &nodes), vec![1, 2, 0]);
        assert_list_integrity(&list, &nodes);
    }
}
