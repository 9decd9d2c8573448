use std::collections::HashSet;

use glyph_nn::network::NeuronId;
use glyph_nn::{
    encode, softmax, BilevelImage, CrossEntropyLoss, Initializer, Network, NetworkBuilder, Pixel,
    PixelOrder, Sgd,
};
use rand::{rngs::StdRng, SeedableRng};

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Walks the graph from the input layer by following outgoing edges and
/// returns the size of each level reached.
fn traversed_layer_sizes(net: &Network) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut frontier: Vec<NeuronId> = net.input_layer().to_vec();
    while !frontier.is_empty() {
        sizes.push(frontier.len());
        let mut next = HashSet::new();
        for &id in &frontier {
            for &e in net.neuron(id).output() {
                next.insert(net.edge(e).to);
            }
        }
        frontier = next.into_iter().collect();
    }
    sizes
}

#[test]
fn constant_generator_builds_connected_graph() {
    let init = Initializer::Constant { value: 1.2 };
    let net = NetworkBuilder::build(2, 1, &init, &mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(net.layer_sizes(), vec![2, 1, 10]);
    assert_eq!(traversed_layer_sizes(&net), vec![2, 1, 10]);

    for &id in net.input_layer() {
        let n = net.neuron(id);
        assert!(n.input().is_empty());
        assert_eq!(n.bias, 0.0);
        assert_eq!(n.activation, 0.0);
    }
    for &id in net.output_layer() {
        assert!(net.neuron(id).output().is_empty());
    }
    for layer in &net.layers()[1..] {
        for &id in layer {
            assert_eq!(net.neuron(id).bias, 1.2);
        }
    }
    assert!(net.edges().iter().all(|e| e.weight == 1.2));
}

#[test]
fn every_layer_is_fully_connected_to_the_next() {
    let net = NetworkBuilder::build(12, 2, &Initializer::HeNormal, &mut StdRng::seed_from_u64(1)).unwrap();
    let layers = net.layers();
    assert_eq!(net.layer_sizes(), vec![12, 6, 3, 10]);

    for k in 0..layers.len() - 1 {
        let next: HashSet<NeuronId> = layers[k + 1].iter().copied().collect();
        for &id in &layers[k] {
            let targets: HashSet<NeuronId> = net.neuron(id).output().iter().map(|&e| net.edge(e).to).collect();
            assert_eq!(net.neuron(id).output().len(), next.len());
            assert_eq!(targets, next);
        }
        for &id in &layers[k + 1] {
            assert_eq!(net.neuron(id).input().len(), layers[k].len());
        }
    }
}

/// Hand-built 2-2-2 network with literal weights and biases.
fn two_two_two() -> Network {
    let mut net = Network::new();
    let input = net.add_layer(&[0.0, 0.0]);
    let hidden = net.add_layer(&[0.3, 0.4]);
    let output = net.add_layer(&[0.1, 0.2]);

    net.connect(input[0], hidden[0], 0.7).unwrap();
    net.connect(input[0], hidden[1], 0.8).unwrap();
    net.connect(input[1], hidden[0], 0.9).unwrap();
    net.connect(input[1], hidden[1], 0.01).unwrap();
    net.connect(hidden[0], output[0], 0.02).unwrap();
    net.connect(hidden[0], output[1], 0.03).unwrap();
    net.connect(hidden[1], output[0], 0.04).unwrap();
    net.connect(hidden[1], output[1], 0.05).unwrap();

    net.set_input(&[0.5, 0.6]).unwrap();
    net
}

#[test]
fn forward_matches_hand_computation() {
    let mut net = two_two_two();
    let probabilities = net.forward();

    let hidden_a = relu(0.7 * 0.5 + 0.9 * 0.6 + 0.3);
    let hidden_b = relu(0.8 * 0.5 + 0.01 * 0.6 + 0.4);
    let logits = [
        hidden_a * 0.02 + hidden_b * 0.04 + 0.1,
        hidden_a * 0.03 + hidden_b * 0.05 + 0.2,
    ];
    let expected = softmax(&logits);

    let hidden = &net.layers()[1];
    assert!((net.neuron(hidden[0]).activation - hidden_a).abs() < 1e-12);
    assert!((net.neuron(hidden[1]).activation - hidden_b).abs() < 1e-12);

    for i in 0..2 {
        assert!((net.logits()[i] - logits[i]).abs() < 1e-12);
        assert!((probabilities[i] - expected[i]).abs() < 1e-12);
    }
    assert_eq!(net.output_activations(), probabilities);

    let inputs: Vec<f64> = net.input_layer().iter().map(|&id| net.neuron(id).activation).collect();
    assert_eq!(inputs, vec![0.5, 0.6]);
}

#[test]
fn forward_is_idempotent() {
    let mut net = NetworkBuilder::build(16, 2, &Initializer::HeNormal, &mut StdRng::seed_from_u64(4)).unwrap();
    let mut img = BilevelImage::new(4, 4, Pixel::White);
    img.set(2, 1, Pixel::Black);
    encode(&mut net, &img, PixelOrder::RowMajor).unwrap();

    let first = net.forward();
    let activations: Vec<f64> = net.neurons().iter().map(|n| n.activation).collect();
    let second = net.forward();
    let again: Vec<f64> = net.neurons().iter().map(|n| n.activation).collect();

    assert_eq!(first, second);
    assert_eq!(activations, again);
    assert!((first.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!(first.iter().all(|&p| (0.0..=1.0).contains(&p)));
}

#[test]
fn encoder_feeds_forward_pass() {
    let mut net = NetworkBuilder::build(4, 1, &Initializer::Constant { value: 0.5 }, &mut StdRng::seed_from_u64(0)).unwrap();
    let mut img = BilevelImage::new(2, 2, Pixel::White);
    img.set(0, 0, Pixel::Black);
    img.set(1, 1, Pixel::Black);
    encode(&mut net, &img, PixelOrder::RowMajor).unwrap();

    let inputs: Vec<f64> = net.input_layer().iter().map(|&id| net.neuron(id).activation).collect();
    assert_eq!(inputs, vec![0.0, 1.0, 1.0, 0.0]);

    // Constant weights make every output identical.
    let p = net.forward();
    for &x in &p {
        assert!((x - 0.1).abs() < 1e-12);
    }

    let wrong = BilevelImage::new(3, 3, Pixel::White);
    assert!(encode(&mut net, &wrong, PixelOrder::RowMajor).is_err());
}

#[test]
fn backward_step_reduces_loss_on_same_sample() {
    let mut net = two_two_two();
    let target = [0.0, 1.0];
    let before = CrossEntropyLoss::loss(&target, &net.forward()).unwrap();

    Sgd::new(0.5).backward(&mut net, &target).unwrap();
    let after = CrossEntropyLoss::loss(&target, &net.forward()).unwrap();
    assert!(after < before, "{before} -> {after}");
}
