//! Prompt templates for the social units.

use ca_oracle::PromptTemplate;

pub const FIND_PERSON: PromptTemplate = PromptTemplate::new(
    "Based on the following information, help me select the most suitable friend to interact with:

1. Your Profile:
   - Gender: {gender}
   - Education: {education}
   - Personality: {personality}
   - Occupation: {occupation}

2. Your Current Intention: {intention}

3. Your Current Emotion: {emotion_types}

4. Your Current Thought: {thought}

5. Your Friends List (shown as index-to-relationship pairs):
   {friend_info}
   Note: For each friend, the relationship strength (0-100) indicates how close we are

Please analyze and select:
1. The most appropriate friend based on relationship strength and my current intention
2. Whether we should meet online or offline

Requirements:
- You must respond in this exact format: [mode, friend_index]
- mode must be either 'online' or 'offline'
- friend_index must be an integer representing the friend's position in the list (starting from 0)

Example valid outputs:
['online', 0]  - means meet the first friend online
['offline', 2] - means meet the third friend offline",
);

pub const MESSAGE: PromptTemplate = PromptTemplate::new(
    "As a {gender} {occupation} with {education} education and {personality} personality,
generate a message for a friend (relationship strength: {relationship_score}/100)
about {intention}.

Your current emotion: {emotion_types}
Your current thought: {thought}

Previous chat history:
{chat_history}

Generate a natural and contextually appropriate message.
Keep it under 100 characters.
The message should reflect my personality and background.
{discussion_constraint}",
);
