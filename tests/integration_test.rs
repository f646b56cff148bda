use cvmatrix::{
    frame_channel, ConfigError, Direction, Freshness, Matrix, MatrixConfig, Node, NodeId, NodeKind,
    Param, RampMode, RawNode, Sample, StartSide, BINARY_TRUE, MAX_NEGATIVE, MAX_POSITIVE,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn constants(kind: NodeKind, values: &[Sample]) -> Node {
    let params: Vec<Param> = values.iter().copied().map(Param::Constant).collect();
    Node::new(kind).with_params(&params).unwrap()
}

/// Registers a single node, runs one pass and returns its result.
fn run_once(node: Node) -> Sample {
    let mut matrix = Matrix::default();
    let id = matrix.add(node).unwrap();
    matrix.run().unwrap();
    matrix.result(id).unwrap()
}

#[test]
/// Sum and product of constants
fn arithmetic_of_constants() {
    init_tracing();
    assert_eq!(run_once(constants(NodeKind::Sum, &[1, 2, 4])), 7);
    assert_eq!(run_once(constants(NodeKind::Multiply, &[2, 4, 8])), 64);
}

#[test]
fn inversions() {
    assert_eq!(run_once(constants(NodeKind::Invert, &[10])), -10);
    assert_eq!(run_once(constants(NodeKind::Invert, &[-10])), 10);
    assert_eq!(run_once(constants(NodeKind::Invert, &[MAX_NEGATIVE])), MAX_POSITIVE);
    assert_eq!(run_once(constants(NodeKind::Invert, &[0])), 0);

    assert_eq!(run_once(constants(NodeKind::InvertEachSide, &[0])), MAX_POSITIVE);
    assert_eq!(run_once(constants(NodeKind::InvertEachSide, &[MAX_POSITIVE])), 0);
    assert_eq!(run_once(constants(NodeKind::InvertEachSide, &[MAX_NEGATIVE])), -1);
}

#[test]
fn delay_line_holds_its_constructed_result_until_the_first_pass() {
    let mut matrix = Matrix::default();
    let delay = matrix
        .add(constants(NodeKind::DelayLine, &[10]).with_result(0))
        .unwrap();

    assert_eq!(matrix.result(delay), Some(0));
    matrix.run().unwrap();
    assert_eq!(matrix.result(delay), Some(10));
}

#[test]
fn memory_set_hold_clear() {
    assert_eq!(run_once(constants(NodeKind::Memory, &[10, 1, 0])), 10);
    assert_eq!(run_once(constants(NodeKind::Memory, &[10, 0, 0]).with_result(5)), 5);
    assert_eq!(run_once(constants(NodeKind::Memory, &[10, 0, 1]).with_result(7)), 0);
    assert_eq!(run_once(constants(NodeKind::Memory, &[10, 1, 1]).with_result(7)), 0);
}

#[test]
fn lfo_pulse_through_the_matrix() {
    let mut matrix = Matrix::default();
    let lfo = matrix
        .add(constants(NodeKind::LfoPulse(StartSide::Top), &[3, 2, 1, 10, -5]))
        .unwrap();
    let state = |m: &Matrix| m.node(lfo).unwrap().high_res_state();

    matrix.run().unwrap();
    assert_eq!(matrix.result(lfo), Some(10));
    assert_eq!(state(&matrix), 0);

    matrix.set_param(lfo, 2, Param::Constant(0)).unwrap();

    matrix.run().unwrap();
    assert_eq!(matrix.result(lfo), Some(10));
    assert_eq!(state(&matrix), 1);

    matrix.run().unwrap();
    assert_eq!(matrix.result(lfo), Some(-5));
    assert_eq!(state(&matrix), 2);

    matrix.run().unwrap();
    assert_eq!(matrix.result(lfo), Some(10));
    assert_eq!(state(&matrix), 0);

    // retrigger in the middle of a period
    matrix.run().unwrap();
    matrix.set_param(lfo, 2, Param::Constant(1)).unwrap();
    matrix.run().unwrap();
    assert_eq!(matrix.result(lfo), Some(10));
    assert_eq!(state(&matrix), 0);
}

#[test]
/// Feeding the same values through references instead of constants must not
/// change any fold.
fn folds_do_not_care_where_values_come_from() {
    let values: [Sample; 4] = [3, -7, 12, 1];
    let kinds = [
        NodeKind::Sum,
        NodeKind::Multiply,
        NodeKind::Max,
        NodeKind::Min,
        NodeKind::BinaryAnd,
        NodeKind::BinaryOr,
    ];

    for &kind in kinds.iter() {
        let direct = run_once(constants(kind, &values));

        let mut matrix = Matrix::default();
        let mut params = Vec::new();
        for (i, &v) in values.iter().enumerate() {
            // alternate between a constant and a delay line echoing it
            if i % 2 == 0 {
                params.push(Param::Constant(v));
            } else {
                let source = matrix.add(constants(NodeKind::DelayLine, &[v])).unwrap();
                params.push(Param::Node(source));
            }
        }
        let node = matrix
            .add(Node::new(kind).with_params(&params).unwrap())
            .unwrap();
        matrix.run().unwrap();

        assert_eq!(matrix.result(node), Some(direct), "{}", kind);
    }
}

#[test]
fn registry_overflow_is_an_error() {
    init_tracing();
    let mut matrix = Matrix::new(MatrixConfig::default().with_capacity(3));
    for _ in 0..3 {
        matrix.add(constants(NodeKind::Sum, &[1])).unwrap();
    }

    assert_eq!(
        matrix.add(constants(NodeKind::Sum, &[1])),
        Err(ConfigError::RegistryFull { capacity: 3 })
    );
    assert_eq!(matrix.len(), 3);
}

#[test]
/// Backward references see this pass, forward references see the last one.
fn reference_freshness_follows_registration_order() {
    let mut matrix = Matrix::default();

    // 0: reads node 2 (registered later) -> previous pass
    let early = matrix
        .add(Node::new(NodeKind::DelayLine).with_params(&[NodeId::new(2).into()]).unwrap())
        .unwrap();
    // 1: counter, adds one to itself every pass
    let counter = matrix
        .add(Node::new(NodeKind::Sum).with_params(&[NodeId::new(1).into(), Param::Constant(1)]).unwrap())
        .unwrap();
    // 2: reads the counter (registered earlier) -> current pass
    let late = matrix
        .add(Node::new(NodeKind::DelayLine).with_params(&[counter.into()]).unwrap())
        .unwrap();

    assert_eq!(matrix.registry().freshness(early, late), Freshness::Previous);
    assert_eq!(matrix.registry().freshness(late, counter), Freshness::Current);

    for pass in 1..=5 {
        matrix.run().unwrap();
        assert_eq!(matrix.result(counter), Some(pass));
        assert_eq!(matrix.result(late), Some(pass));
        assert_eq!(matrix.result(early), Some(pass - 1));
    }

    let mut feedback = matrix.registry().feedback_edges();
    feedback.sort();
    assert_eq!(feedback, vec![(counter, counter), (late, early)]);
}

#[test]
/// A ramp retriggered by a trigger node that watches the ramp's own output
/// through a one-pass feedback path.
fn self_retriggering_ramp() {
    let mut matrix = Matrix::default();
    let mode = RampMode {
        reset_on_finish: false,
        direction: Direction::Up,
        bipolar: false,
    };

    // 0: ramp, trigger comes from node 2 (previous pass)
    let ramp = matrix
        .add(
            Node::new(NodeKind::Ramp(mode))
                .with_params(&[Param::Constant(40), NodeId::new(2).into(), Param::Constant(0)])
                .unwrap(),
        )
        .unwrap();
    // 1: true once the ramp has passed 100
    let reached = matrix
        .add(Node::new(NodeKind::Compare).with_params(&[ramp.into(), Param::Constant(100)]).unwrap())
        .unwrap();
    // 2: one-pass pulse on that
    matrix
        .add(Node::new(NodeKind::Trigger).with_params(&[reached.into()]).unwrap())
        .unwrap();

    // the ramp is stopped until its first trigger, which never comes
    matrix.run().unwrap();
    assert_eq!(matrix.result(ramp), Some(0));

    // kick it off by hand
    matrix.set_param(ramp, 1, Param::Constant(1)).unwrap();
    matrix.run().unwrap();
    matrix.set_param(ramp, 1, NodeId::new(2).into()).unwrap();

    let mut seen = Vec::new();
    for _ in 0..8 {
        matrix.run().unwrap();
        seen.push(matrix.result(ramp).unwrap());
    }
    assert_eq!(seen, vec![40, 80, 120, 0, 40, 80, 120, 0]);
}

#[test]
fn input_to_output_through_a_chain() {
    init_tracing();
    let mut matrix = Matrix::default();
    let a = matrix.add(constants(NodeKind::Input, &[0])).unwrap();
    let b = matrix.add(constants(NodeKind::Input, &[1])).unwrap();
    let scaled = matrix
        .add(Node::new(NodeKind::Scale).with_params(&[a.into(), b.into()]).unwrap())
        .unwrap();
    let exp = matrix
        .add(Node::new(NodeKind::PositiveExp).with_params(&[scaled.into()]).unwrap())
        .unwrap();
    let gate = matrix
        .add(Node::new(NodeKind::Compare).with_params(&[a.into(), b.into()]).unwrap())
        .unwrap();
    matrix
        .add(Node::new(NodeKind::Output).with_params(&[Param::Constant(0), scaled.into()]).unwrap())
        .unwrap();
    matrix
        .add(Node::new(NodeKind::Output).with_params(&[Param::Constant(1), exp.into()]).unwrap())
        .unwrap();
    matrix
        .add(Node::new(NodeKind::Output).with_params(&[Param::Constant(2), gate.into()]).unwrap())
        .unwrap();

    let out = matrix.cycle(&[127, 127]).unwrap().to_vec();
    assert_eq!(&out[..3], &[127, 127, 0]);

    let out = matrix.cycle(&[100, 64]).unwrap().to_vec();
    assert_eq!(out[0], 50);
    assert_eq!(out[1], matrix.table().lookup(50));
    assert_eq!(out[2], BINARY_TRUE);
}

#[test]
fn raw_patch_loading() {
    use cvmatrix::node::kind_code;

    let mut matrix = Matrix::default();
    let patch = [
        // 0: input 0
        RawNode {
            kind: kind_code::INPUT,
            params: [0; 8],
            constant_mask: 0b1,
            params_in_use: 1,
            result: 0,
        },
        // 1: invert node 0
        RawNode {
            kind: kind_code::INVERT,
            params: [0; 8],
            constant_mask: 0b0,
            params_in_use: 1,
            result: 0,
        },
        // 2: output 3 <- node 1
        RawNode {
            kind: kind_code::OUTPUT,
            params: [3, 1, 0, 0, 0, 0, 0, 0],
            constant_mask: 0b01,
            params_in_use: 2,
            result: 0,
        },
    ];
    for raw in patch.iter() {
        matrix.add_raw(*raw).unwrap();
    }

    matrix.set_input(0, -128).unwrap();
    matrix.run().unwrap();
    assert_eq!(matrix.outputs()[3], 127);
    // zeroed slots past each kind's inputs are not wiring
    assert!(matrix.registry().feedback_edges().is_empty());
    assert_eq!(matrix.registry().wiring().edge_count(), 2);

    assert_eq!(
        matrix.add_raw(RawNode {
            kind: 4242,
            ..RawNode::default()
        }),
        Err(ConfigError::UnknownKind(4242))
    );
}

#[test]
fn reset_invalidates_the_patch() {
    let mut matrix = Matrix::default();
    let first = matrix.add(constants(NodeKind::Sum, &[5])).unwrap();
    matrix.run().unwrap();
    assert_eq!(matrix.result(first), Some(5));

    matrix.reset();
    assert!(matrix.is_empty());
    assert_eq!(matrix.result(first), None);
    assert!(!matrix.completion().is_raised());

    let again = matrix.add(constants(NodeKind::Sum, &[9])).unwrap();
    assert_eq!(again, first);
    matrix.run().unwrap();
    assert_eq!(matrix.result(again), Some(9));
}

#[test]
/// The output stage on another thread only reads frames after their pass
/// completed.
fn output_stage_on_another_thread() {
    let (sink, mut source) = frame_channel(8, 16);
    let mut matrix = Matrix::default().with_frame_sink(sink);
    let counter = matrix
        .add(Node::new(NodeKind::Sum).with_params(&[NodeId::new(0).into(), Param::Constant(1)]).unwrap())
        .unwrap();
    matrix
        .add(Node::new(NodeKind::Output).with_params(&[Param::Constant(7), counter.into()]).unwrap())
        .unwrap();

    let consumer = std::thread::spawn(move || {
        let mut frame = [0; 8];
        let mut seen = Vec::new();
        while seen.len() < 10 {
            if source.pop(&mut frame) {
                seen.push(frame[7]);
            } else {
                std::thread::yield_now();
            }
        }
        seen
    });

    for _ in 0..10 {
        matrix.run().unwrap();
    }

    let seen = consumer.join().unwrap();
    assert_eq!(seen, (1..=10).collect::<Vec<Sample>>());
    assert_eq!(matrix.dropped_frames(), 0);
}

#[test]
fn junk_in_unread_raw_slots_is_harmless() {
    use cvmatrix::node::kind_code;

    let mut matrix = Matrix::default();
    let input = matrix
        .add_raw(RawNode {
            kind: kind_code::INPUT,
            params: [1, 0, 0, 0, 0, 0, 200, 1000],
            constant_mask: 0b1,
            params_in_use: 1,
            result: 0,
        })
        .unwrap();

    assert!(matrix.registry().feedback_edges().is_empty());
    matrix.set_input(1, 33).unwrap();
    matrix.run().unwrap();
    assert_eq!(matrix.result(input), Some(33));
}

#[test]
fn live_edit_can_take_back_a_forward_reference() {
    let mut matrix = Matrix::default();
    let delay = matrix.add(constants(NodeKind::DelayLine, &[1])).unwrap();

    matrix.set_param(delay, 0, NodeId::new(5).into()).unwrap();
    assert_eq!(
        matrix.run(),
        Err(ConfigError::DanglingReference {
            index: 5,
            registered: 1
        })
    );

    matrix.set_param(delay, 0, Param::Constant(3)).unwrap();
    matrix.run().unwrap();
    assert_eq!(matrix.result(delay), Some(3));
}
