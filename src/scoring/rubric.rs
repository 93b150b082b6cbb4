//! Evaluation protocol text and prompt assembly

use crate::sequences::Sequence;

/// System instruction sent with every scoring request.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional Vincennes sequential image quality audit expert. Evaluate the image sequence quality strictly according to the protocol, considering the progression across all 4 steps.";

/// The nine-dimension scoring rubric, six graded levels per dimension.
pub const SCORING_CRITERIA: &str = r#"## SCORING CRITERIA (0-5 scale with exhaustive rubrics)

**CONSISTENCY DIMENSION** - Evaluate across the entire 4-step sequence

**Semantic Consistency (0-5):** Alignment between visual representation and conceptual meaning throughout the sequence, considering both explicit and implicit elements.
* 0 (Rejected): Visual representation completely contradicts the core concept; the subject matter is wrong or misrepresented; the intended meaning is entirely lost or reversed; major misunderstanding of the explanation.
* 1 (Very Poor): Core theme is present but significantly distorted; key elements are misinterpreted or omitted; contradictory elements disrupt understanding; the overall narrative is unclear or misleading.
* 2 (Poor): Basic concept is recognizable but flawed in key details; the main idea is conveyed but with significant errors; some elements align with the intended meaning while others are incorrectly represented or confusing.
* 3 (Fair): Core concept is accurately captured, and the meaning is mostly clear; most elements align with the intended idea, but some minor semantic inconsistencies or unclear representations persist.
* 4 (Good): Both explicit and implicit meanings are captured well; a nuanced understanding of the concept is conveyed, and even subtle or abstract aspects are represented accurately; rich semantic content with few inconsistencies.
* 5 (Excellent): Every conceptual nuance is perfectly expressed; the visual representation fully aligns with the intended meaning, conveying deep understanding of all semantic layers; flawless conceptual execution with no distortions.

**Factual Consistency (0-5):** Adherence to empirical facts, scientific knowledge, and logical relationships, ensuring the representation is grounded in reality and subject to coherent reasoning.
* 0 (Rejected): Violates fundamental physical laws or scientific principles; contains logical contradictions; depicts completely impossible scenarios; misrepresents core historical or factual knowledge.
* 1 (Very Poor): Core factual relationships are incorrect or distorted; frequent contradictions with known facts or logical reasoning; significant inaccuracies in science, history, or other factual domains; implausible scenarios that undermine credibility.
* 2 (Poor): While most factual relationships are generally correct, there are notable inaccuracies or misrepresentations; the core facts are plausible but some details are wrong or incomplete; minor factual errors that don't severely affect the overall portrayal.
* 3 (Fair): Majority of factual elements are accurate, and logical relationships are well-maintained; only minor inaccuracies in specific domains or specialized knowledge; generally plausible depiction with slight factual discrepancies.
* 4 (Good): The depiction shows a high level of factual accuracy; complex relationships are correctly represented; specialized knowledge is precisely applied, with only minor technical inaccuracies or inconsistencies.
* 5 (Excellent): Complete empirical accuracy; there are no detectable factual errors or logical contradictions; every aspect aligns perfectly with the relevant knowledge domains, demonstrating exemplary research and execution.

**Spatial-Temporal Consistency (0-5):** Coherence in spatial evolution and temporal progression across the sequence, considering both short-term and long-term changes in the context of a causal narrative.
* 0 (Rejected): Spatial and temporal evolution is entirely incoherent; there are no logical relationships between the states; abrupt, random shifts with no narrative consistency; objects or environments teleport without any narrative justification.
* 1 (Very Poor): Significant spatial and temporal inconsistencies that hinder narrative flow; poor understanding of progression and transitions; movement and positioning are illogical, with abrupt and unmotivated changes that disrupt continuity.
* 2 (Poor): Some logical progression is present, but spatial evolution and temporal transitions are often unclear or inconsistent; movements are somewhat plausible but lack cohesion in complex scenarios or fail to respect causal logic.
* 3 (Fair):  Spatial and temporal transitions are mostly logical and plausible, with smooth progression overall; occasional disruptions or inconsistencies in movement or timing, but the general evolution remains coherent and the causal narrative holds.
* 4 (Good): Complex spatial evolution and temporal changes are well-executed; transitions are smooth and consistent; sophisticated understanding of causal relationships is applied with few minor inconsistencies that do not disrupt the overall flow.
* 5 (Excellent): Spatial and temporal evolution is flawlessly consistent with the narrative's causal logic; all changes in position, movement, and timing align with the story's progression and adhere to both immediate and long-term narrative consistency; impeccable execution of spatial-temporal relationships throughout the sequence.

**AESTHETIC DIMENSION** - Evaluate overall aesthetic quality across the sequence

**Expressiveness (0-5):** The emotional impact and visual storytelling conveyed through the arrangement of visual elements, balance, and flow across the sequence.
* 0 (Rejected): No emotional depth or clear visual narrative; elements lack cohesion or meaning; chaotic and incoherent design with no emotional connection.
* 1 (Very Poor): Minimal emotional expression; poorly communicated visual narrative; conflicting elements and arrangement that detract from the intended message.
* 2 (Poor): Simple visual arrangement with limited emotional expression; some effort at narrative is apparent, but the flow feels basic or incomplete; uneven balance in visual elements.
* 3 (Fair): Clear and effective emotional expression; visual flow supports the intended narrative; balanced elements that guide the viewer's attention with good use of space and composition.
* 4 (Good): Strong emotional engagement; dynamic arrangement that supports a compelling visual narrative; sophisticated design choices that enhance emotional tone and storytelling.
* 5 (Excellent): Exceptional emotional resonance; perfectly executed visual narrative that captures and amplifies the theme; masterful expressiveness in the arrangement of elements that tells a compelling story.

**Artistic Quality (0-5):** Overall aesthetic appeal, style coherence, and artistic merit across the sequence.
* 0 (Rejected): No coherent style; elements clash severely; visually painful to view; complete lack of artistic consideration.
* 1 (Very Poor): Inappropriate style choices; poor visual appeal; unbalanced aesthetic elements; amateurish execution; distracting aesthetic flaws.
* 2 (Poor): Functional but unrefined aesthetic; adequate visual appeal; simple style application; limited artistic effectiveness.
* 3 (Fair): Coherent style with good aesthetic relationships; appropriate emotional tone; technically sound artistic execution; generally pleasing appearance.
* 4 (Good): Sophisticated artistic execution; strong emotional impact through style; complex aesthetic relationships handled well; professional artistic quality.
* 5 (Excellent): Perfect aesthetic harmony throughout; innovative and emotionally resonant style; flawless artistic execution; exemplary aesthetic storytelling; world-class artistic design.

**Authenticity (0-5):** The believability and naturalness of the elements, ensuring that the sequence aligns with the intended reality or narrative.
* 0 (Rejected): The sequence looks completely artificial and lacks any attempt at realism; obvious digital artifacts; cartoonish appearance with no connection to reality.
* 1 (Very Poor): Major unrealistic elements dominate the sequence; obvious digital artifacts; unnatural lighting, textures, or distortions; the image feels clearly synthetic.
* 2 (Poor): Generally believable but with noticeable artificial elements; some aspects appear unnatural or inconsistent in realism, but the overall image is somewhat convincing.
* 3 (Fair): Good level of realism with only minor artificial elements; generally convincing depiction of reality; some minor issues in complex areas (lighting, texture, etc.).
* 4 (Good): Very believable image approaching photographic quality; subtle details enhance realism, and artificial elements are barely detectable.
* 5 (Excellent): Indistinguishable from real photography; perfect realism in all aspects; flawless material representation and expert-level rendering that conveys authenticity seamlessly.

**PHYSICALITY DIMENSION** - Evaluate physical properties and dynamics across the sequence

**Basic Properties (0-5):** Accuracy in fundamental scene properties including object quantities, basic shapes, geometric relationships, and size proportions across the sequence.
* 0 (Rejected): Wrong number of major objects; impossible geometric relationships; completely unrealistic proportions; no understanding of basic spatial organization.
* 1 (Very Poor): Significant errors in object counts (>30% wrong); major shape distortions; poor geometric understanding; clearly wrong size relationships.
* 2 (Poor): Approximate object counts generally correct within 20%; recognizable but imperfect shapes; basic geometric relationships mostly maintained; roughly plausible proportions.
* 3 (Fair): Object counts within 15% of intended; shapes accurately represented with minor flaws; good geometric consistency; generally correct size relationships.
* 4 (Good): Precise object quantities; well-defined shapes; sophisticated geometric relationships; excellent proportional accuracy; professional-level spatial organization.
* 5 (Excellent): Perfect object counts and distributions; mathematically precise shapes and forms; flawless geometric relationships; exact proportional accuracy throughout.

**Dynamics and Interactivity (0-5):** Realism in physical dynamics including motion trajectories, force interactions, fluid/rigid body behaviors, and object interactions across the sequence.
* 0 (Rejected): Motion trajectories completely unrealistic; impossible force interactions; no understanding of dynamics; objects interact in physically impossible ways; fluid/rigid body behaviors completely wrong.
* 1 (Very Poor): Major motion trajectory errors; unrealistic force applications; poor understanding of dynamics; clearly wrong interaction patterns; fluid behaviors significantly distorted.
* 2 (Poor): Basic motion trajectories generally plausible; simple force interactions mostly correct; adequate but imperfect dynamics; generally believable interactions with noticeable flaws.
* 3 (Fair): Good motion trajectory realism; proper force applications; technically sound dynamics; convincing interaction patterns with minor flaws; fluid/rigid body behaviors mostly correct.
* 4 (Good): Sophisticated motion trajectories; complex force interactions handled well; professional-level dynamics; realistic and nuanced object interactions; accurate fluid/rigid body simulations.
* 5 (Excellent): Perfect motion physics throughout; flawless force interactions; exemplary dynamics in all aspects; indistinguishable from real physical interactions; professional-grade fluid/rigid body behaviors.

**Physical Reliability (0-5):** Adherence to fundamental physical laws across the sequence.
* 0 (Rejected): Spatial evolution is completely illogical or random; objects appear, disappear, or teleport without cause; no discernible progression; chaotic and physically impossible movements.
* 1 (Very Poor): Major inconsistencies in object movement or scene evolution; poor understanding of physical progression; frequent illogical transitions; severe continuity errors in position or timing.
* 2 (Poor): Basic spatial progression is generally logical but contains noticeable flaws; some object movements or transitions lack smoothness; plausible overall but with clear inconsistencies in complex actions.
* 3 (Fair): Spatial evolution is mostly logical and coherent; object movements show reasonable continuity; minor issues in timing or complex transitions; generally smooth but not fully polished.
* 4 (Good): Spatial progression is consistently logical and well-executed; complex movements and transitions are handled adeptly; strong temporal coherence with only subtle imperfections.
* 5 (Excellent): Spatial-temporal evolution is perfectly logical, fluid, and physically plausible; all movements and transitions demonstrate flawless continuity and natural progression; exemplary understanding of spatiotemporal dynamics."#;

const OUTPUT_FORMAT: &str = r#"## Output Format

**Do not include any other text, explanations, or labels.** You must return only nine lines of text, each containing a metric and the corresponding score, for example:

**Example Output:**
Semantic Consistency: 3
Factual Consistency: 5
Spatial-Temporal Consistency: 2
Expressiveness: 4
Artistic Quality: 3
Authenticity: 4
Basic Properties: 5
Dynamics and Interactivity: 3
Physical Reliability: 5

---

**IMPORTANT Enforcement:**

Be EXTREMELY strict in your evaluation. A score of '5' should be exceedingly rare and reserved only for sequences that truly excel and meet the highest possible standards in each metric. If there is any doubt, downgrade the score.

Evaluate the ENTIRE 4-step sequence as a cohesive unit, considering progression, continuity, and evolution across all steps.

Each dimension has specific, exhaustive criteria that must be followed precisely. Do not generalize or make assumptions beyond what is explicitly stated in the rubrics.

Please strictly adhere to the scoring criteria and follow the template format when providing your results."#;

/// Assemble the full user-facing evaluation prompt for one sequence.
pub fn build_evaluation_prompt(sequence: &Sequence) -> String {
    let steps_text = sequence
        .prompts
        .iter()
        .map(|step| {
            format!(
                "Step {}:\n  Prompt: {}\n  Explanation: {}\n",
                step.step, step.prompt, step.explanation
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Please evaluate this 4-step image sequence strictly and return ONLY the nine scores as requested.\n\n\
         # SEQUENTIAL Image Quality Evaluation Protocol\n\n\
         ## System Instruction\n\
         You are an AI quality auditor for sequential text-to-image generation. Apply these rules with ABSOLUTE RUTHLESSNESS. Only sequences meeting the HIGHEST standards should receive top scores.\n\n\
         **Sequence Information**\n\
         - INDEX: {}\n\
         - CATEGORY: {}\n\
         - PROCESS TYPE: {}\n\n\
         **Step-by-Step Sequence Description:**\n\
         {}\n\n\
         ---\n\n\
         {}\n\n\
         ---\n\n\
         {}",
        sequence.index,
        sequence.category,
        sequence.process_type,
        steps_text,
        SCORING_CRITERIA,
        OUTPUT_FORMAT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::dimensions::ALL_DIMENSIONS;
    use crate::sequences::{Sequence, StepPrompt};

    #[test]
    fn test_prompt_names_every_dimension() {
        let seq = Sequence {
            index: "0001".to_string(),
            category: "physics".to_string(),
            process_type: "melting".to_string(),
            prompts: vec![StepPrompt {
                step: 1,
                prompt: "an ice cube on a plate".to_string(),
                explanation: "solid state".to_string(),
            }],
        };

        let prompt = build_evaluation_prompt(&seq);
        for dim in ALL_DIMENSIONS {
            assert!(prompt.contains(dim.label()), "missing {}", dim.label());
        }
        assert!(prompt.contains("INDEX: 0001"));
        assert!(prompt.contains("an ice cube on a plate"));
    }
}
